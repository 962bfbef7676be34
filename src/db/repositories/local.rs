//! In-memory repository implementation.
//!
//! Holds the observation stream, business hours, timezone assignments and
//! finished report artifacts behind a single read/write lock. Data is
//! seeded from the three CSV files of the monitoring pipeline, or inserted
//! programmatically by tests.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::api::{BusinessHourRule, Observation, StoreId};
use crate::db::config::DataConfig;
use crate::db::models::{BusinessHoursRecord, StoreStatusRecord, TimezoneRecord};
use crate::db::repository::{
    ArtifactRepository, ErrorContext, RepositoryError, RepositoryResult, StoreDataRepository,
};

#[derive(Default)]
struct Inner {
    /// Observations per store, kept sorted by timestamp ascending.
    observations: HashMap<StoreId, Vec<Observation>>,
    business_hours: HashMap<StoreId, Vec<BusinessHourRule>>,
    timezones: HashMap<StoreId, String>,
    artifacts: HashMap<String, Vec<u8>>,
    max_timestamp: Option<DateTime<Utc>>,
}

/// In-memory repository.
#[derive(Default)]
pub struct LocalRepository {
    inner: RwLock<Inner>,
}

impl LocalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded from the CSV files named by `config`.
    ///
    /// Missing seed files are skipped with a warning so the server can
    /// start against a partial data set; malformed rows fail the load.
    pub fn from_config(config: &DataConfig) -> RepositoryResult<Self> {
        let repo = Self::new();
        repo.load_store_status(config.store_status_path())?;
        repo.load_business_hours(config.business_hours_path())?;
        repo.load_timezones(config.timezones_path())?;
        Ok(repo)
    }

    fn load_store_status(&self, path: impl AsRef<Path>) -> RepositoryResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "store status seed file missing, starting empty");
            return Ok(());
        }
        let mut reader = csv_reader(path)?;
        let mut count = 0usize;
        for result in reader.deserialize::<StoreStatusRecord>() {
            let record = result.map_err(|e| csv_row_error(path, e))?;
            self.insert_observation(record.into_observation()?);
            count += 1;
        }
        info!(path = %path.display(), count, "loaded store status observations");
        Ok(())
    }

    fn load_business_hours(&self, path: impl AsRef<Path>) -> RepositoryResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "business hours seed file missing, starting empty");
            return Ok(());
        }
        let mut reader = csv_reader(path)?;
        let mut count = 0usize;
        for result in reader.deserialize::<BusinessHoursRecord>() {
            let record = result.map_err(|e| csv_row_error(path, e))?;
            self.insert_business_hours(record.into_rule()?);
            count += 1;
        }
        info!(path = %path.display(), count, "loaded business hour rules");
        Ok(())
    }

    fn load_timezones(&self, path: impl AsRef<Path>) -> RepositoryResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "timezone seed file missing, starting empty");
            return Ok(());
        }
        let mut reader = csv_reader(path)?;
        let mut count = 0usize;
        for result in reader.deserialize::<TimezoneRecord>() {
            let record = result.map_err(|e| csv_row_error(path, e))?;
            self.set_timezone(StoreId::new(record.store_id), record.timezone_str);
            count += 1;
        }
        info!(path = %path.display(), count, "loaded timezone assignments");
        Ok(())
    }

    /// Insert one observation, keeping the store's stream sorted.
    pub fn insert_observation(&self, observation: Observation) {
        let mut inner = self.inner.write();
        inner.max_timestamp = Some(match inner.max_timestamp {
            Some(current) => current.max(observation.timestamp_utc),
            None => observation.timestamp_utc,
        });
        let stream = inner
            .observations
            .entry(observation.store_id.clone())
            .or_default();
        // Equal timestamps keep insertion order (stable tie-break).
        let at = stream.partition_point(|o| o.timestamp_utc <= observation.timestamp_utc);
        stream.insert(at, observation);
    }

    /// Insert one business-hour rule.
    pub fn insert_business_hours(&self, rule: BusinessHourRule) {
        self.inner
            .write()
            .business_hours
            .entry(rule.store_id.clone())
            .or_default()
            .push(rule);
    }

    /// Assign a timezone to a store, replacing any previous assignment.
    pub fn set_timezone(&self, store_id: StoreId, timezone: String) {
        self.inner.write().timezones.insert(store_id, timezone);
    }
}

fn csv_reader(path: &Path) -> RepositoryResult<csv::Reader<std::fs::File>> {
    csv::Reader::from_path(path).map_err(|e| {
        RepositoryError::configuration(format!("cannot open {}: {}", path.display(), e))
    })
}

fn csv_row_error(path: &Path, e: csv::Error) -> RepositoryError {
    RepositoryError::validation_with_context(
        format!("malformed row: {}", e),
        ErrorContext::new("seed_load").with_details(path.display().to_string()),
    )
}

#[async_trait]
impl StoreDataRepository for LocalRepository {
    async fn distinct_store_ids(&self) -> RepositoryResult<Vec<StoreId>> {
        let inner = self.inner.read();
        let mut ids: Vec<StoreId> = inner.observations.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn max_observation_timestamp(&self) -> RepositoryResult<Option<DateTime<Utc>>> {
        Ok(self.inner.read().max_timestamp)
    }

    async fn observations_in_window(
        &self,
        store_id: &StoreId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Observation>> {
        let inner = self.inner.read();
        let Some(stream) = inner.observations.get(store_id) else {
            return Ok(Vec::new());
        };
        let lo = stream.partition_point(|o| o.timestamp_utc < start);
        let hi = stream.partition_point(|o| o.timestamp_utc <= end);
        Ok(stream[lo..hi].to_vec())
    }

    async fn business_hours_for_weekday(
        &self,
        store_id: &StoreId,
        day_of_week: u8,
    ) -> RepositoryResult<Vec<BusinessHourRule>> {
        let inner = self.inner.read();
        Ok(inner
            .business_hours
            .get(store_id)
            .map(|rules| {
                rules
                    .iter()
                    .filter(|r| r.day_of_week == day_of_week)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn timezone_for_store(&self, store_id: &StoreId) -> RepositoryResult<Option<String>> {
        Ok(self.inner.read().timezones.get(store_id).cloned())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl ArtifactRepository for LocalRepository {
    async fn store_artifact(&self, report_id: &str, bytes: Vec<u8>) -> RepositoryResult<()> {
        let mut inner = self.inner.write();
        if inner.artifacts.contains_key(report_id) {
            return Err(RepositoryError::conflict_with_context(
                "artifact already stored",
                ErrorContext::new("store_artifact")
                    .with_entity("artifact")
                    .with_entity_id(report_id),
            ));
        }
        inner.artifacts.insert(report_id.to_string(), bytes);
        Ok(())
    }

    async fn fetch_artifact(&self, report_id: &str) -> RepositoryResult<Option<Vec<u8>>> {
        Ok(self.inner.read().artifacts.get(report_id).cloned())
    }
}
