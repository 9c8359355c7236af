//! Web upload front end
//!
//! Each request carries its own upload and result buffers; nothing is
//! shared between requests except the read-only config.

mod page;
mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use crate::config::Config;

/// Shared, read-only server state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Build the router for the upload form
pub fn create_router(config: Arc<Config>) -> Router {
    // Leave room for the multipart framing around the file itself
    let body_limit = config.max_upload_bytes.saturating_add(64 * 1024);

    Router::new()
        .route("/", get(routes::index))
        .route("/split", post(routes::split_upload))
        .route("/api/split", post(routes::api_split))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(AppState { config })
}

/// Serve until the process is interrupted
pub async fn serve(config: Config) -> Result<()> {
    let addr = config.bind;
    let app = create_router(Arc::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("Starting server on http://{}", addr);
    println!("Daily split upload form: http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
