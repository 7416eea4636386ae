//! Travel Tip HTTP Server Binary
//!
//! Loads configuration, builds the repository, sets up the router and
//! starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # In-memory repository with demo data
//! cargo run --bin travel-tip-server
//!
//! # JSON file repository
//! REPOSITORY_TYPE=file REPOSITORY_PATH=./locations.json cargo run --bin travel-tip-server
//! ```
//!
//! # Environment Variables
//!
//! - `TRAVEL_TIP_CONFIG`: Path to `travel-tip.toml`
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: `local` or `file`
//! - `REPOSITORY_PATH`: JSON file for the `file` repository
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use travel_tip::config::AppConfig;
use travel_tip::db::RepositoryFactory;
use travel_tip::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Also captures `log` records from the library.
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

    info!("Starting Travel Tip HTTP Server");

    let config = AppConfig::load().context("Failed to load configuration")?;
    let stats = config.stats_settings()?;

    let repository = RepositoryFactory::from_settings(&config.repository)
        .await
        .context("Failed to initialize repository")?;
    info!("Repository initialized successfully");

    let app = create_router(AppState::new(repository, stats));

    let addr = config.socket_addr()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
