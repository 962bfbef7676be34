//! Async report generation service.
//!
//! Runs the full aggregation for one report job in the background: resolves
//! the global anchor, walks every known store, serializes the CSV artifact
//! and drives the job to its terminal state, emitting progress logs along
//! the way.

use std::sync::Arc;

use tracing::warn;

use crate::api::ReportRow;
use crate::db::repository::FullRepository;
use crate::services::aggregator;
use crate::services::report_tracker::{LogLevel, ReportTracker};

/// Bound on concurrently running report jobs. Triggers beyond this limit
/// still return immediately; their jobs queue as Running until a slot
/// frees up.
pub const MAX_CONCURRENT_REPORTS: usize = 4;

/// Column order of the report artifact.
const CSV_HEADER: [&str; 7] = [
    "store_id",
    "uptime_last_hour",
    "uptime_last_day",
    "uptime_last_week",
    "downtime_last_hour",
    "downtime_last_day",
    "downtime_last_week",
];

/// Serialize report rows as the CSV artifact, header row included.
pub fn render_csv(rows: &[ReportRow]) -> Result<Vec<u8>, String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| format!("CSV header write failed: {}", e))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| format!("CSV row write failed: {}", e))?;
    }
    writer
        .into_inner()
        .map_err(|e| format!("CSV flush failed: {}", e))
}

/// Generate a report asynchronously: resolve the anchor, aggregate every
/// store, store the CSV artifact and complete the job.
///
/// This function is designed to be spawned as a background task. It logs
/// progress to the report tracker so callers can follow along via SSE.
/// Per-store failures (e.g., a malformed timezone assignment) become
/// errored rows; only job-level failures (repository or artifact errors)
/// mark the job failed.
pub async fn generate_report_async(
    report_id: String,
    tracker: ReportTracker,
    repo: Arc<dyn FullRepository>,
    default_timezone: String,
) -> Result<(), String> {
    tracker.log(&report_id, LogLevel::Info, "Starting report generation...");

    let anchor = match repo.max_observation_timestamp().await {
        Ok(Some(anchor)) => anchor,
        Ok(None) => {
            // No observations anywhere: an empty report is still a
            // completed report, so the artifact is a header-only CSV.
            tracker.log(
                &report_id,
                LogLevel::Warning,
                "No observations found; producing empty report",
            );
            let bytes = match render_csv(&[]) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracker.fail_report(&report_id, &e);
                    return Err(e);
                }
            };
            if let Err(e) = repo.store_artifact(&report_id, bytes).await {
                let msg = format!("Failed to store artifact: {}", e);
                tracker.fail_report(&report_id, &msg);
                return Err(msg);
            }
            tracker.complete_report(&report_id, Some(serde_json::json!({ "stores": 0 })));
            return Ok(());
        }
        Err(e) => {
            let msg = format!("Failed to resolve anchor timestamp: {}", e);
            tracker.fail_report(&report_id, &msg);
            return Err(msg);
        }
    };

    let stores = match repo.distinct_store_ids().await {
        Ok(stores) => stores,
        Err(e) => {
            let msg = format!("Failed to list stores: {}", e);
            tracker.fail_report(&report_id, &msg);
            return Err(msg);
        }
    };
    tracker.log(
        &report_id,
        LogLevel::Info,
        format!("Aggregating {} stores (anchor {})", stores.len(), anchor),
    );

    let mut rows = Vec::with_capacity(stores.len());
    let mut failed_rows = 0usize;
    for store_id in stores {
        match aggregator::compute_store_row(repo.as_ref(), &store_id, anchor, &default_timezone)
            .await
        {
            Ok(row) => rows.push(row),
            Err(e) => {
                failed_rows += 1;
                warn!(store_id = %store_id, error = %e, "store aggregation failed");
                tracker.log(
                    &report_id,
                    LogLevel::Warning,
                    format!("store {}: {}", store_id, e),
                );
                rows.push(ReportRow::errored(store_id, e.to_string()));
            }
        }
    }

    let bytes = match render_csv(&rows) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracker.fail_report(&report_id, &e);
            return Err(e);
        }
    };
    if let Err(e) = repo.store_artifact(&report_id, bytes).await {
        let msg = format!("Failed to store artifact: {}", e);
        tracker.fail_report(&report_id, &msg);
        return Err(msg);
    }

    tracker.log(
        &report_id,
        LogLevel::Success,
        format!(
            "Report complete: {} stores, {} errored rows",
            rows.len(),
            failed_rows
        ),
    );
    tracker.complete_report(
        &report_id,
        Some(serde_json::json!({
            "stores": rows.len(),
            "errored_rows": failed_rows,
        })),
    );

    Ok(())
}
