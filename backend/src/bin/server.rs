//! Launch Board HTTP Server Binary
//!
//! Loads the first snapshot (with bounded retry), starts the background
//! refresh loop and serves the page and JSON API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin launch-board-server
//!
//! # Faster refresh against a different endpoint
//! REFRESH_INTERVAL_SECS=60 LAUNCH_SOURCE_URL=http://localhost:9000/upcoming \
//!   cargo run --bin launch-board-server
//! ```
//!
//! # Environment Variables
//!
//! - `LAUNCH_BOARD_CONFIG`: path to a TOML config file
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `LAUNCH_SOURCE_URL`, `REFRESH_INTERVAL_SECS`, `STARTUP_ATTEMPTS`,
//!   `STARTUP_BACKOFF_SECS`, `FETCH_TIMEOUT_SECS`, `FILTER_WINDOW_DAYS`,
//!   `MAX_LAUNCHES`: see [`launch_board::config::AppConfig`]
//! - `RUST_LOG`: Log filter, e.g. `launch_board=debug,tower_http=info`
//!   (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use launch_board::config::AppConfig;
use launch_board::http::{create_router, AppState};
use launch_board::query::LaunchQuery;
use launch_board::refresh::{snapshot_store, RefreshScheduler};
use launch_board::services::MarkerMapBuilder;
use launch_board::source::LaunchLibraryClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Launch Board server");

    let config = AppConfig::load()?;
    let policy = config.refresh_policy();
    info!(
        "Source {} refreshed every {:?} ({} startup attempts)",
        config.source.endpoint, policy.interval, policy.retry.max_attempts
    );

    let source = LaunchLibraryClient::new(&config.source.endpoint, config.fetch_timeout())?;
    let builder = MarkerMapBuilder::new(config.map_center(), config.map.zoom);
    let (writer, reader) = snapshot_store();

    let scheduler = RefreshScheduler::new(Arc::new(source), Arc::new(builder), writer, policy);
    let monitor = scheduler.monitor();

    // Nothing is served until the first snapshot exists.
    let ready = match scheduler.initialize().await {
        Ok(ready) => ready,
        Err(e) => {
            error!("Could not load launch data, exiting: {}", e);
            return Err(e.into());
        }
    };
    let refresh_task = ready.spawn();

    let state = AppState::new(LaunchQuery::new(reader), monitor)
        .with_page_refresh(config.server.page_refresh_secs);
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresh_task.abort();
    info!("Server stopped");
    Ok(())
}

/// Filter from a `RUST_LOG`-style directive; `info` when unset or invalid.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_accepts_per_target_directives() {
        let filter = log_filter(Some("launch_board=debug,tower_http=warn"));
        let rendered = filter.to_string();
        assert!(rendered.contains("launch_board=debug"));
        assert!(rendered.contains("tower_http=warn"));
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
        assert_eq!(log_filter(Some("  ")).to_string(), "info");
        assert_eq!(log_filter(Some("launch_board=loud")).to_string(), "info");
    }
}
