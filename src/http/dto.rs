//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.

use serde::{Deserialize, Serialize};

/// Response for triggering a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerReportResponse {
    /// Report ID for polling and download
    pub report_id: String,
}

/// Query parameters for the report status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Report ID returned by the trigger endpoint
    pub report_id: String,
}

/// Report status response.
///
/// `download_url` is present only once the report is complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStatusResponse {
    /// Report status: Running, Complete or Failed
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Repository status
    pub repository: String,
}
