//! Database module for store monitoring data.
//!
//! This module provides abstractions for data access via the Repository
//! pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services/) - Aggregation & Job Pipeline  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │        (in-memory, CSV-seeded)                │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The module includes:
//! - `repository`: Trait definitions for data and artifact access
//! - `repositories::local`: In-memory implementation seeded from CSV
//! - `models`: Seed-file record types
//! - `config`: TOML/env configuration for seed locations and defaults

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod models;
pub mod repositories;
pub mod repository;

pub use config::{DataConfig, DEFAULT_TIMEZONE};
pub use repositories::LocalRepository;
pub use repository::{
    ArtifactRepository, ErrorContext, FullRepository, RepositoryError, RepositoryResult,
    StoreDataRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

fn create_selected_repository(config: &DataConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
    Ok(Arc::new(LocalRepository::from_config(config)?))
}

/// Initialize the global repository singleton from environment config.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let config = DataConfig::from_env().map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let repo =
        create_selected_repository(&config).map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
