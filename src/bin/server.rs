//! Storewatch HTTP Server Binary
//!
//! This is the main entry point for the storewatch REST API server.
//! It seeds the repository, sets up the HTTP router, and starts serving
//! requests.
//!
//! # Usage
//!
//! ```bash
//! STOREWATCH_DATA_DIR=data cargo run --bin storewatch-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `STOREWATCH_CONFIG`: Optional TOML configuration file
//! - `STOREWATCH_DATA_DIR`: Directory holding the seed CSV files
//! - `STOREWATCH_DEFAULT_TZ`: Zone for stores with no timezone assignment
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use storewatch::db;
use storewatch::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting storewatch HTTP server");

    let config = db::DataConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;

    // Initialize global repository once and reuse it across the app
    db::init_repository()?;
    let repository = std::sync::Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    // Create application state
    let state = AppState::new(repository, config.data.default_timezone.clone());

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
