//! Application state for the HTTP server.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::db::repository::FullRepository;
use crate::services::report_processor::MAX_CONCURRENT_REPORTS;
use crate::services::report_tracker::ReportTracker;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for data access
    pub repository: Arc<dyn FullRepository>,
    /// Registry of report jobs
    pub tracker: ReportTracker,
    /// Slots bounding concurrently running report jobs
    pub report_slots: Arc<Semaphore>,
    /// Zone applied to stores with no timezone assignment
    pub default_timezone: String,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn FullRepository>, default_timezone: impl Into<String>) -> Self {
        Self {
            repository,
            tracker: ReportTracker::new(),
            report_slots: Arc::new(Semaphore::new(MAX_CONCURRENT_REPORTS)),
            default_timezone: default_timezone.into(),
        }
    }
}
