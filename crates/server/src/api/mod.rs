//! API module providing HTTP endpoints for the reminder service.
//!
//! This module is organized into submodules:
//! - `clients` - Client management endpoints (/api/clients/*)
//! - `emails` - Reminder overview (/api/emails)
//! - `health` - Health check endpoint (/healthz)

pub mod clients;
pub mod emails;
pub mod health;

use crate::AppResources;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the full router with all routes and middleware attached.
pub fn router(app_resources: AppResources) -> Router {
    Router::new()
        .nest("/api/clients", clients::router())
        .nest("/api/emails", emails::router())
        .route("/healthz", get(health::health).head(health::health))
        .layer(axum::Extension(app_resources))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Starts the web server with all configured routes.
#[tracing::instrument(skip(app_resources))]
pub async fn start_webserver(app_resources: AppResources) -> color_eyre::Result<()> {
    let addr = app_resources.config.socket_addr()?;
    let router = router(app_resources);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, router)
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
