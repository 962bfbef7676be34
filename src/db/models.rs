//! Seed-file record types.
//!
//! The monitoring data arrives as three CSV files: the status observation
//! stream, the per-weekday business hours, and the store timezone
//! assignments. These records mirror the CSV columns verbatim (including
//! the `dayOfWeek` header and the `" UTC"` timestamp suffix of the source
//! data) and convert into the domain types of [`crate::api`].

use chrono::{NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::api::{BusinessHourRule, Observation, ObservationStatus, StoreId};
use crate::db::repository::{ErrorContext, RepositoryError};

/// One row of `store_status.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreStatusRecord {
    pub store_id: String,
    pub status: String,
    pub timestamp_utc: String,
}

impl StoreStatusRecord {
    /// Parse into a domain observation.
    pub fn into_observation(self) -> Result<Observation, RepositoryError> {
        let status = match self.status.as_str() {
            "active" => ObservationStatus::Active,
            "inactive" => ObservationStatus::Inactive,
            other => {
                return Err(RepositoryError::validation_with_context(
                    format!("unknown status value: {}", other),
                    ErrorContext::new("load_store_status")
                        .with_entity("observation")
                        .with_entity_id(&self.store_id),
                ))
            }
        };

        // Timestamps are recorded as "2023-01-25 10:05:00.123456 UTC"
        let raw = self.timestamp_utc.trim_end_matches(" UTC");
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map_err(|e| {
            RepositoryError::validation_with_context(
                format!("bad timestamp {:?}: {}", self.timestamp_utc, e),
                ErrorContext::new("load_store_status")
                    .with_entity("observation")
                    .with_entity_id(&self.store_id),
            )
        })?;

        Ok(Observation {
            store_id: StoreId::new(self.store_id),
            timestamp_utc: naive.and_utc(),
            status,
        })
    }
}

/// One row of `menu_hours.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessHoursRecord {
    pub store_id: String,
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: u8,
    pub start_time_local: String,
    pub end_time_local: String,
}

impl BusinessHoursRecord {
    /// Parse into a domain business-hour rule.
    pub fn into_rule(self) -> Result<BusinessHourRule, RepositoryError> {
        if self.day_of_week > 6 {
            return Err(RepositoryError::validation_with_context(
                format!("day_of_week out of range: {}", self.day_of_week),
                ErrorContext::new("load_business_hours")
                    .with_entity("business_hours")
                    .with_entity_id(&self.store_id),
            ));
        }

        let parse_time = |raw: &str| {
            NaiveTime::parse_from_str(raw, "%H:%M:%S").map_err(|e| {
                RepositoryError::validation_with_context(
                    format!("bad local time {:?}: {}", raw, e),
                    ErrorContext::new("load_business_hours")
                        .with_entity("business_hours")
                        .with_entity_id(&self.store_id),
                )
            })
        };

        Ok(BusinessHourRule {
            start_time_local: parse_time(&self.start_time_local)?,
            end_time_local: parse_time(&self.end_time_local)?,
            store_id: StoreId::new(self.store_id),
            day_of_week: self.day_of_week,
        })
    }
}

/// One row of `timezones.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimezoneRecord {
    pub store_id: String,
    pub timezone_str: String,
}
