//! HTTP server for the contacts API.
//!
//! Routes live under `/api/v1`; `/health` sits outside the prefix. Any other
//! path, or a known path with an unsupported method, answers 404 with
//! `{msg: "Route does not exist"}`.

pub mod handlers;
pub mod upload;

use crate::config::Config;
use crate::metrics::Metrics;
use crate::services::{ContactService, SearchService};
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub contact_service: Arc<dyn ContactService>,
    pub search_service: Arc<dyn SearchService>,
    pub metrics: Metrics,
}

/// Create the API router
pub fn create_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::route_not_found),
        )
        .nest(
            "/api/v1",
            Router::new()
                .route(
                    "/contacts",
                    post(handlers::create_contact)
                        .get(handlers::list_contacts)
                        .fallback(handlers::route_not_found),
                )
                .route(
                    "/contacts/search",
                    post(handlers::search_contacts).fallback(handlers::route_not_found),
                )
                .route(
                    "/contacts/:id",
                    patch(handlers::update_contact)
                        .delete(handlers::delete_contact)
                        .fallback(handlers::route_not_found),
                ),
        )
        .fallback(handlers::route_not_found)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
        .layer(middleware::map_response(handlers::request_timed_out))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured address and serve until Ctrl+C or SIGTERM.
pub async fn run_server(state: AppState, config: &Config) -> Result<()> {
    let app = create_router(state, config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
