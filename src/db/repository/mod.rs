//! Repository traits for store monitoring data.
//!
//! The traits here define the storage interface the service layer depends
//! on: observation, business-hours and timezone lookups on one side, and
//! durable report artifacts on the other. Implementations live in
//! `db::repositories`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::{BusinessHourRule, Observation, StoreId};

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Repository trait for observation, business-hours and timezone data.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait StoreDataRepository: Send + Sync {
    /// All store identifiers present in the observation data, sorted
    /// ascending. Row order of the generated report follows this order.
    async fn distinct_store_ids(&self) -> RepositoryResult<Vec<StoreId>>;

    /// The maximum observation timestamp across all stores, or `None` when
    /// no observations exist at all.
    ///
    /// This is the single global anchor every relative reporting window is
    /// measured against.
    async fn max_observation_timestamp(&self) -> RepositoryResult<Option<DateTime<Utc>>>;

    /// Observations for one store with `start <= timestamp_utc <= end`,
    /// ordered by timestamp ascending.
    async fn observations_in_window(
        &self,
        store_id: &StoreId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Observation>>;

    /// Business-hour rules for one store and weekday (0 = Monday).
    /// An empty result means "no recorded hours" for that weekday.
    async fn business_hours_for_weekday(
        &self,
        store_id: &StoreId,
        day_of_week: u8,
    ) -> RepositoryResult<Vec<BusinessHourRule>>;

    /// Timezone identifier assigned to the store, or `None` when the store
    /// has no assignment (callers fall back to the configured default).
    async fn timezone_for_store(&self, store_id: &StoreId) -> RepositoryResult<Option<String>>;

    /// Check that the repository is reachable and holds data.
    async fn health_check(&self) -> RepositoryResult<bool>;
}

/// Repository trait for finished report artifacts.
///
/// Artifacts are keyed by report id, written exactly once, and readable any
/// number of times.
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Store the artifact bytes for a report. Fails with a conflict error
    /// if an artifact for the id already exists.
    async fn store_artifact(&self, report_id: &str, bytes: Vec<u8>) -> RepositoryResult<()>;

    /// Fetch the artifact bytes for a report, or `None` if absent.
    async fn fetch_artifact(&self, report_id: &str) -> RepositoryResult<Option<Vec<u8>>>;
}

/// Combined repository interface used by the application.
pub trait FullRepository: StoreDataRepository + ArtifactRepository {}

impl<T: StoreDataRepository + ArtifactRepository> FullRepository for T {}
