//! Status interpolation engine.
//!
//! Turns a sparse observation stream into continuous uptime/downtime
//! durations for a bounded UTC interval under a last-known-status hold
//! policy: unobserved time is attributed to the nearest observation's
//! status, held backward before the first observation and forward after
//! the last. An interval with no observations at all counts entirely as
//! downtime.

use chrono::{DateTime, Utc};

use crate::api::{Observation, ObservationStatus};

/// Compute `(uptime_seconds, downtime_seconds)` attributable to
/// `[clip_start, clip_end)`.
///
/// Observations need not lie inside the interval; spans are clamped so
/// every second of the interval is attributed exactly once. Inverted
/// intervals yield `(0, 0)`.
pub fn interpolate_uptime_downtime(
    observations: &[Observation],
    clip_start: DateTime<Utc>,
    clip_end: DateTime<Utc>,
) -> (i64, i64) {
    if clip_end <= clip_start {
        return (0, 0);
    }
    let total = (clip_end - clip_start).num_seconds();
    if observations.is_empty() {
        // Absence of evidence is treated as inactive, by policy.
        return (0, total);
    }

    let mut sorted: Vec<&Observation> = observations.iter().collect();
    sorted.sort_by_key(|o| o.timestamp_utc);

    let mut uptime = 0i64;
    let mut downtime = 0i64;
    let mut credit = |status: ObservationStatus, seconds: i64| match status {
        ObservationStatus::Active => uptime += seconds,
        ObservationStatus::Inactive => downtime += seconds,
    };

    // Each adjacent pair holds the earlier status over the span between them.
    for pair in sorted.windows(2) {
        let span_start = pair[0].timestamp_utc.max(clip_start);
        let span_end = pair[1].timestamp_utc.min(clip_end);
        if span_start >= span_end {
            continue;
        }
        credit(pair[0].status, (span_end - span_start).num_seconds());
    }

    // Hold the first observation's status backward to the interval start.
    let first = sorted[0];
    if first.timestamp_utc > clip_start {
        let held_until = first.timestamp_utc.min(clip_end);
        credit(first.status, (held_until - clip_start).num_seconds());
    }

    // Hold the last observation's status forward to the interval end.
    let last = sorted[sorted.len() - 1];
    if last.timestamp_utc < clip_end {
        let held_from = last.timestamp_utc.max(clip_start);
        credit(last.status, (clip_end - held_from).num_seconds());
    }

    (uptime, downtime)
}
