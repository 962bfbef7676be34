//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the report
//! pipeline in the service layer.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::sse::{Event, Sse},
    response::IntoResponse,
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{HealthResponse, ReportQuery, ReportStatusResponse, TriggerReportResponse};
use super::error::AppError;
use super::state::AppState;
use crate::services::report_tracker::ReportState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the
/// repository is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository: repo_status,
    }))
}

// =============================================================================
// Report Lifecycle
// =============================================================================

/// POST /trigger_report
///
/// Register a new report job and return its id immediately. The
/// aggregation itself runs as a background task.
pub async fn trigger_report(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TriggerReportResponse>), AppError> {
    let report_id = state.tracker.create_report();
    let response_report_id = report_id.clone();

    let tracker = state.tracker.clone();
    let repo = state.repository.clone();
    let slots = state.report_slots.clone();
    let default_timezone = state.default_timezone.clone();

    tokio::spawn(async move {
        // Queue behind earlier jobs when all report slots are busy; the
        // job stays Running until it gets to execute.
        let _permit = match slots.acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                tracker.fail_report(&report_id, "report scheduler unavailable");
                return;
            }
        };
        let _ = crate::services::report_processor::generate_report_async(
            report_id,
            tracker,
            repo,
            default_timezone,
        )
        .await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(TriggerReportResponse {
            report_id: response_report_id,
        }),
    ))
}

/// GET /get_report?report_id=...
///
/// Non-blocking, point-in-time read of a report job's state. Unknown ids
/// are a distinguished 404, never reported as complete.
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> HandlerResult<ReportStatusResponse> {
    let state_now = state
        .tracker
        .state(&query.report_id)
        .ok_or_else(|| AppError::UnknownReportId(query.report_id.clone()))?;

    let response = match state_now {
        ReportState::Running => ReportStatusResponse {
            status: "Running".to_string(),
            download_url: None,
        },
        ReportState::Complete => ReportStatusResponse {
            status: "Complete".to_string(),
            download_url: Some(format!("/download/{}", query.report_id)),
        },
        ReportState::Failed => ReportStatusResponse {
            status: "Failed".to_string(),
            download_url: None,
        },
    };

    Ok(Json(response))
}

/// GET /download/{report_id}
///
/// Download the finished CSV artifact. Only valid once the job is
/// Complete; a Failed job never produces a downloadable artifact.
pub async fn download_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    match state.tracker.state(&report_id) {
        None => return Err(AppError::UnknownReportId(report_id)),
        Some(ReportState::Running) => {
            return Err(AppError::ArtifactNotReady(format!(
                "Report {} is still running",
                report_id
            )))
        }
        Some(ReportState::Failed) => {
            return Err(AppError::NotFound(format!(
                "Report {} failed; no artifact available",
                report_id
            )))
        }
        Some(ReportState::Complete) => {}
    }

    let bytes = state
        .repository
        .fetch_artifact(&report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artifact for report {} missing", report_id)))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"report_{}.csv\"", report_id),
        ),
    ];
    Ok((headers, bytes))
}

// =============================================================================
// Async Job Management
// =============================================================================

/// GET /reports/{report_id}/logs
///
/// Stream report job logs via Server-Sent Events (SSE).
pub async fn stream_report_logs(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Verify the report exists
    if state.tracker.get_report(&report_id).is_none() {
        return Err(AppError::UnknownReportId(report_id));
    }

    let tracker = state.tracker.clone();
    let stream = async_stream::stream! {
        let mut last_log_count = 0;
        loop {
            // Get current logs
            let logs = tracker.get_logs(&report_id);

            // Send new logs since last check
            for log in logs.iter().skip(last_log_count) {
                let event_data = serde_json::to_string(log).unwrap_or_default();
                yield Ok(Event::default().data(event_data));
            }
            last_log_count = logs.len();

            // Check if the job reached a terminal state
            if let Some(report) = tracker.get_report(&report_id) {
                if report.state.is_terminal() {
                    let final_event = serde_json::json!({
                        "status": report.state,
                        "summary": report.summary,
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
            } else {
                break;
            }

            // Wait before checking again
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}
