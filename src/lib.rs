//! # Storewatch Backend
//!
//! Store uptime monitoring and report generation engine.
//!
//! This crate estimates, per store and per rolling time window, how much of
//! the store's business hours it was operationally active versus inactive,
//! given sparse, irregularly-sampled status observations. Reports are
//! generated asynchronously and downloaded as CSV. The backend exposes a
//! REST API via Axum.
//!
//! ## Features
//!
//! - **Status Interpolation**: last-known-status hold over sparse observations
//! - **Business Hours**: per-weekday local windows, timezone-aware conversion
//! - **Aggregation**: trailing hour/day/week uptime and downtime per store
//! - **Async Reports**: trigger/poll/download job lifecycle with progress logs
//! - **HTTP API**: RESTful endpoints for report management
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Core domain types shared across layers
//! - [`models`]: Time utilities (local/UTC conversion, interval overlap)
//! - [`db`]: Repository pattern over observation, business-hours, timezone
//!   and artifact storage
//! - [`services`]: Interpolation engine, business-window expansion,
//!   aggregation and the report job pipeline
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
