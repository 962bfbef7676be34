//! Per-store uptime/downtime aggregation.
//!
//! For each named reporting period the aggregator walks the store-local
//! calendar days covered by the window, expands each day's business hours
//! into clipped UTC sub-intervals, runs the interpolation engine over the
//! observations of each sub-interval and accumulates seconds. All windows
//! are anchored at the single most recent observation timestamp across all
//! stores, so every store's "last hour" is measured against the same
//! reference instant.

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::api::{PeriodTotals, ReportRow, StoreId};
use crate::db::repository::{RepositoryError, StoreDataRepository};
use crate::models::time::{parse_timezone, utc_to_local, TimeError};
use crate::services::business_hours::business_windows_for_day;
use crate::services::interpolation::interpolate_uptime_downtime;

/// Named trailing reporting periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    LastHour,
    LastDay,
    LastWeek,
}

impl ReportPeriod {
    pub const ALL: [ReportPeriod; 3] = [
        ReportPeriod::LastHour,
        ReportPeriod::LastDay,
        ReportPeriod::LastWeek,
    ];

    /// Window length of the period.
    pub fn duration(&self) -> Duration {
        match self {
            ReportPeriod::LastHour => Duration::hours(1),
            ReportPeriod::LastDay => Duration::days(1),
            ReportPeriod::LastWeek => Duration::weeks(1),
        }
    }

    /// Seconds per output unit: minutes for the hour window, hours for the
    /// day and week windows.
    pub fn unit_divisor(&self) -> f64 {
        match self {
            ReportPeriod::LastHour => 60.0,
            ReportPeriod::LastDay | ReportPeriod::LastWeek => 3600.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportPeriod::LastHour => "last_hour",
            ReportPeriod::LastDay => "last_day",
            ReportPeriod::LastWeek => "last_week",
        }
    }
}

/// Error computing one store's report row.
#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Round to 2 decimals, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Accumulate uptime/downtime seconds for one store over one UTC window.
///
/// Day iteration uses the store-local calendar: the window bounds are
/// converted into the store's zone and each local date is walked inclusive,
/// so the weekday rule near midnight follows the store's clock, not UTC's.
pub async fn compute_period_totals(
    repo: &dyn StoreDataRepository,
    store_id: &StoreId,
    tz_name: &str,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<PeriodTotals, AggregationError> {
    let mut totals = PeriodTotals::default();

    let mut day = utc_to_local(window_start, tz_name)?.date();
    let last_day = utc_to_local(window_end, tz_name)?.date();
    while day <= last_day {
        let weekday = day.weekday().num_days_from_monday() as u8;
        let rules = repo.business_hours_for_weekday(store_id, weekday).await?;
        let windows = business_windows_for_day(&rules, day, tz_name, window_start, window_end)?;

        for (sub_start, sub_end) in windows {
            let observations = repo
                .observations_in_window(store_id, sub_start, sub_end)
                .await?;
            let (up, down) = interpolate_uptime_downtime(&observations, sub_start, sub_end);
            totals.add(up, down);
        }

        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    Ok(totals)
}

/// Compute the full report row for one store: all three periods, anchored
/// at `anchor`, converted to output units and rounded.
pub async fn compute_store_row(
    repo: &dyn StoreDataRepository,
    store_id: &StoreId,
    anchor: DateTime<Utc>,
    default_timezone: &str,
) -> Result<ReportRow, AggregationError> {
    let tz_name = repo
        .timezone_for_store(store_id)
        .await?
        .unwrap_or_else(|| default_timezone.to_string());
    // A malformed assignment fails this row before any day walking.
    parse_timezone(&tz_name)?;

    let mut row = ReportRow {
        store_id: store_id.clone(),
        uptime_last_hour: None,
        uptime_last_day: None,
        uptime_last_week: None,
        downtime_last_hour: None,
        downtime_last_day: None,
        downtime_last_week: None,
        error: None,
    };

    for period in ReportPeriod::ALL {
        let window_start = anchor - period.duration();
        let totals = compute_period_totals(repo, store_id, &tz_name, window_start, anchor).await?;

        let uptime = round2(totals.uptime_seconds as f64 / period.unit_divisor());
        let downtime = round2(totals.downtime_seconds as f64 / period.unit_divisor());
        match period {
            ReportPeriod::LastHour => {
                row.uptime_last_hour = Some(uptime);
                row.downtime_last_hour = Some(downtime);
            }
            ReportPeriod::LastDay => {
                row.uptime_last_day = Some(uptime);
                row.downtime_last_day = Some(downtime);
            }
            ReportPeriod::LastWeek => {
                row.uptime_last_week = Some(uptime);
                row.downtime_last_week = Some(downtime);
            }
        }
    }

    Ok(row)
}
