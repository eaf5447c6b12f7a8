//! Tempo Perf - an in-process runtime performance layer
//!
//! Service binary exposing the performance layer (cache, limiters, stats)
//! over a small ops/debug HTTP surface.

mod api;
mod cache;
mod config;
mod error;
mod limiter;
mod metrics;
mod models;
mod service;
mod tasks;

use std::net::SocketAddr;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use tasks::spawn_maintenance_task;

/// Main entry point for the Tempo Perf service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the shared performance service
/// 4. Start the background maintenance task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tempo_perf=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tempo Perf service");

    // Load configuration from environment variables
    let config = Config::from_env();
    if let Err(err) = config.validate() {
        error!("Configuration rejected: {}", err);
        std::process::exit(1);
    }
    info!(
        "Configuration loaded: max_entries={}, default_ttl={}s, port={}, maintenance_interval={}s",
        config.cache.max_entries,
        config.cache.default_ttl,
        config.server_port,
        config.maintenance_interval
    );

    // Build shared application state around the performance service
    let state = AppState::from_config(&config);
    info!("Performance service initialized");

    // Start background maintenance task
    let maintenance_handle =
        spawn_maintenance_task(state.service.clone(), config.maintenance_interval);
    info!("Background maintenance task started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(maintenance_handle))
        .await
        .unwrap();

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the maintenance task and allows graceful
/// shutdown.
async fn shutdown_signal(maintenance_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the maintenance task
    maintenance_handle.abort();
    warn!("Maintenance task aborted");
}
