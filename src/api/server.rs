//! HTTP server setup and routing
//!
//! Sets up the Axum HTTP server with routes for the flight queue endpoints.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::queue::FlightBoard;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub board: Arc<FlightBoard>,
    pub config: Config,
}

/// Build the application router
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(super::handlers::health))
        // Flight queue
        .route("/flights", post(super::handlers::create_flight))
        .route("/flights/queue", get(super::handlers::get_queue))
        .route("/flights/next", get(super::handlers::next_flight))
        .route("/flights/last", get(super::handlers::last_flight))
        .route("/flights/insert", post(super::handlers::insert_flight))
        .route("/flights/queue/:position", delete(super::handlers::remove_flight))
        .route("/flights/:code/status", patch(super::handlers::update_status))
        // Attach application context
        .with_state(ctx)
        // Request tracing
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}

/// Run the HTTP API server until shutdown
pub async fn run(config: Config, board: Arc<FlightBoard>) -> Result<()> {
    let port = config.port;
    let ctx = AppContext { board, config };
    let app = build_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
