//! Timezone-aware time utilities.
//!
//! Local wall-clock times carry no timezone of their own; they must always
//! be paired with an explicit IANA zone name before conversion. All instant
//! comparisons happen on the UTC timeline.

use std::str::FromStr;

use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Error type for time conversions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// The timezone identifier is not a known IANA zone name.
    #[error("invalid timezone identifier: {0}")]
    InvalidTimezone(String),

    /// The local wall-clock time cannot be mapped into the zone's timeline
    /// (it falls in a DST gap and no adjacent valid instant exists).
    #[error("local time {0} does not exist in zone {1}")]
    NonexistentLocalTime(NaiveDateTime, String),
}

/// Resolve an IANA zone name.
pub fn parse_timezone(tz_name: &str) -> Result<Tz, TimeError> {
    Tz::from_str(tz_name).map_err(|_| TimeError::InvalidTimezone(tz_name.to_string()))
}

/// Interpret a naive local date-time as wall-clock time in the named zone
/// and return the corresponding UTC instant.
///
/// DST edges are resolved deterministically: an ambiguous wall-clock time
/// (fall-back hour) maps to the earliest offset, and a nonexistent one
/// (spring-forward gap) maps to the first valid instant one hour later.
pub fn local_to_utc(local: NaiveDateTime, tz_name: &str) -> Result<DateTime<Utc>, TimeError> {
    let tz = parse_timezone(tz_name)?;
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| TimeError::NonexistentLocalTime(local, tz_name.to_string())),
    }
}

/// Convert a UTC instant to the zone's local wall-clock time.
pub fn utc_to_local(instant: DateTime<Utc>, tz_name: &str) -> Result<NaiveDateTime, TimeError> {
    let tz = parse_timezone(tz_name)?;
    Ok(instant.with_timezone(&tz).naive_local())
}

/// Seconds of overlap between `[a_start, a_end)` and `[b_start, b_end)`.
/// Never negative.
pub fn overlap_seconds(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> i64 {
    let latest_start = a_start.max(b_start);
    let earliest_end = a_end.min(b_end);
    (earliest_end - latest_start).num_seconds().max(0)
}
