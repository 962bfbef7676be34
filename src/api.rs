//! Public API surface for the storewatch backend.
//!
//! This file consolidates the core domain types shared by the repository,
//! service and HTTP layers. All types derive Serialize/Deserialize for JSON
//! serialization.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Store identifier.
///
/// Identifiers come from the observation seed data verbatim and are treated
/// as opaque strings; no numeric structure is assumed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StoreId(pub String);

impl StoreId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StoreId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Operational status reported by a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationStatus {
    Active,
    Inactive,
}

impl ObservationStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ObservationStatus::Active)
    }
}

/// A single status observation for a store.
///
/// Immutable once recorded. Observations are ordered by timestamp within a
/// store; duplicate timestamps are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub store_id: StoreId,
    pub timestamp_utc: DateTime<Utc>,
    pub status: ObservationStatus,
}

/// A business-hours rule for one weekday of one store.
///
/// `day_of_week` is 0 = Monday through 6 = Sunday. A store may have zero,
/// one, or multiple rules per weekday (split shifts). Absence of any rule
/// for a weekday means the store is open all day, which is distinct from an
/// explicit 24-hour rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHourRule {
    pub store_id: StoreId,
    pub day_of_week: u8,
    pub start_time_local: NaiveTime,
    pub end_time_local: NaiveTime,
}

/// Uptime/downtime seconds accumulated for one reporting period, before
/// unit conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub uptime_seconds: i64,
    pub downtime_seconds: i64,
}

impl PeriodTotals {
    pub fn add(&mut self, uptime_seconds: i64, downtime_seconds: i64) {
        self.uptime_seconds += uptime_seconds;
        self.downtime_seconds += downtime_seconds;
    }
}

/// One row of the generated report, covering all three reporting periods
/// for a single store.
///
/// Hour-window values are minutes, day/week-window values are hours, all
/// rounded to 2 decimals. A store whose aggregation failed keeps its row
/// with empty numeric fields; the cause is carried in `error` (surfaced
/// through job logs, never serialized into the CSV artifact).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub store_id: StoreId,
    pub uptime_last_hour: Option<f64>,
    pub uptime_last_day: Option<f64>,
    pub uptime_last_week: Option<f64>,
    pub downtime_last_hour: Option<f64>,
    pub downtime_last_day: Option<f64>,
    pub downtime_last_week: Option<f64>,
    #[serde(skip)]
    pub error: Option<String>,
}

impl ReportRow {
    /// A row carrying only the store id, used when aggregation for the
    /// store failed.
    pub fn errored(store_id: StoreId, error: impl Into<String>) -> Self {
        Self {
            store_id,
            uptime_last_hour: None,
            uptime_last_day: None,
            uptime_last_week: None,
            downtime_last_hour: None,
            downtime_last_day: None,
            downtime_last_week: None,
            error: Some(error.into()),
        }
    }
}
