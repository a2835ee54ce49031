//! SmartFarm API Server
//!
//! This crate provides the HTTP gateway exposing SmartFarm and Raspberry Pi
//! telemetry stored in `MongoDB`.
//!
//! # Architecture
//!
//! The API server is built on Axum and Tokio, providing:
//! - `GET /` liveness status
//! - `GET /data/{source}` time-windowed telemetry reads
//! - `GET /sources` and `GET /health` for discovery and monitoring
//!
//! All handlers share one [`Gateway`] holding the database connection. If the
//! database cannot be reached at startup the server still comes up and
//! answers data requests with 503.
//!
//! # Example
//!
//! ```no_run
//! use api::run_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server().await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
pub mod db;
mod error;
pub mod gateway;
mod routes;
mod state;

pub use config::Config;
pub use error::{ErrorBody, GatewayError, NO_DATA_DETAIL, UNAVAILABLE_DETAIL};
pub use gateway::Gateway;
pub use state::AppState;

use anyhow::Result;
use axum::Router;
use db::DatabaseConfig;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Runs the SmartFarm API server.
///
/// This function loads configuration from environment variables, connects
/// to the database, and starts listening for incoming connections. It handles
/// graceful shutdown on SIGTERM/SIGINT signals and closes the database
/// connection afterwards.
///
/// # Errors
///
/// Returns an error if:
/// - Server configuration cannot be loaded from environment
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
///
/// Database problems are not errors: the server starts in degraded mode.
pub async fn run_server() -> Result<()> {
    let config = Config::from_env()?;

    let gateway = match DatabaseConfig::from_env() {
        Ok(db_config) => Gateway::bootstrap(&db_config).await,
        Err(e) => {
            tracing::error!(error = %e, "Database configuration unusable, starting without a database");
            Gateway::disconnected()
        }
    };

    run_server_with_state(config, AppState::new(gateway)).await
}

/// Runs the SmartFarm API server with the provided configuration and state.
///
/// This is useful for testing or when you want to provide configuration programmatically.
///
/// # Errors
///
/// Returns an error if:
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server_with_state(config: Config, state: AppState) -> Result<()> {
    let addr = config.socket_addr().await?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        database = state.gateway().is_connected(),
        "SmartFarm API server starting"
    );

    let app = create_router(state.clone());
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Listening for connections");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.gateway().shutdown().await;
    served?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Creates the main application router with all routes and middleware.
///
/// This function is public to allow testing the router without starting a full server.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::status_routes())
        .merge(routes::sources_routes())
        .merge(routes::health_routes(state.clone()))
        .merge(routes::data_routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
