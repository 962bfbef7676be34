//! Service layer for business logic and orchestration.
//!
//! This module contains the computation core (interpolation, business-hour
//! expansion, aggregation) and the asynchronous report pipeline that runs
//! it for all stores.

pub mod aggregator;

pub mod business_hours;

pub mod interpolation;

pub mod report_processor;

pub mod report_tracker;


pub use aggregator::{compute_store_row, AggregationError, ReportPeriod};
pub use business_hours::business_windows_for_day;
pub use interpolation::interpolate_uptime_downtime;
pub use report_processor::generate_report_async;
pub use report_tracker::{ReportState, ReportTracker};
