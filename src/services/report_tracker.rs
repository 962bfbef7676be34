//! Report job tracking.
//!
//! In-memory registry for asynchronous report generation jobs. Entries are
//! created `Running`, transition exactly once to a terminal state, and are
//! never deleted for the lifetime of the process. Any number of concurrent
//! status checks may read while the owning job performs its single terminal
//! transition.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// A single log entry with timestamp and message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Report job state. Transitions are monotone: `Running` moves to exactly
/// one of the terminal states and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ReportState {
    Running,
    Complete,
    Failed,
}

impl ReportState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReportState::Running)
    }
}

/// Report job metadata and logs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Report {
    pub report_id: String,
    pub state: ReportState,
    pub logs: Vec<LogEntry>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Summary of the finished job (e.g., row counts)
    pub summary: Option<serde_json::Value>,
}

/// In-memory report tracker.
#[derive(Clone)]
pub struct ReportTracker {
    reports: Arc<RwLock<HashMap<String, Report>>>,
}

impl ReportTracker {
    /// Create a new report tracker.
    pub fn new() -> Self {
        Self {
            reports: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a new report job and return its ID.
    ///
    /// The identifier is unique for the lifetime of the process.
    pub fn create_report(&self) -> String {
        let report_id = Uuid::new_v4().to_string();
        let report = Report {
            report_id: report_id.clone(),
            state: ReportState::Running,
            logs: vec![],
            created_at: chrono::Utc::now(),
            completed_at: None,
            summary: None,
        };
        self.reports.write().insert(report_id.clone(), report);
        report_id
    }

    /// Add a log entry to a report job.
    pub fn log(&self, report_id: &str, level: LogLevel, message: impl Into<String>) {
        let mut reports = self.reports.write();
        if let Some(report) = reports.get_mut(report_id) {
            report.logs.push(LogEntry {
                timestamp: chrono::Utc::now(),
                level,
                message: message.into(),
            });
        }
    }

    /// Mark a report as complete with an optional summary.
    ///
    /// Has no effect if the report is already in a terminal state.
    pub fn complete_report(&self, report_id: &str, summary: Option<serde_json::Value>) {
        let mut reports = self.reports.write();
        if let Some(report) = reports.get_mut(report_id) {
            if report.state.is_terminal() {
                return;
            }
            report.state = ReportState::Complete;
            report.completed_at = Some(chrono::Utc::now());
            report.summary = summary;
        }
    }

    /// Mark a report as failed.
    ///
    /// Has no effect if the report is already in a terminal state.
    pub fn fail_report(&self, report_id: &str, error_message: impl Into<String>) {
        let mut reports = self.reports.write();
        if let Some(report) = reports.get_mut(report_id) {
            if report.state.is_terminal() {
                return;
            }
            report.state = ReportState::Failed;
            report.completed_at = Some(chrono::Utc::now());
            report.logs.push(LogEntry {
                timestamp: chrono::Utc::now(),
                level: LogLevel::Error,
                message: error_message.into(),
            });
        }
    }

    /// Get a report by ID. `None` distinguishes an unknown identifier.
    pub fn get_report(&self, report_id: &str) -> Option<Report> {
        self.reports.read().get(report_id).cloned()
    }

    /// Point-in-time state of a report, or `None` for an unknown id.
    pub fn state(&self, report_id: &str) -> Option<ReportState> {
        self.reports.read().get(report_id).map(|r| r.state)
    }

    /// Get all logs for a report.
    pub fn get_logs(&self, report_id: &str) -> Vec<LogEntry> {
        self.reports
            .read()
            .get(report_id)
            .map(|report| report.logs.clone())
            .unwrap_or_default()
    }
}

impl Default for ReportTracker {
    fn default() -> Self {
        Self::new()
    }
}
