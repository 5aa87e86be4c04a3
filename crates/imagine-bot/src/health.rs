//! Health check endpoints for the hosting platform.

use std::net::SocketAddr;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
}

/// Liveness text at the root path.
pub async fn alive() -> &'static str {
    "Bot is alive"
}

/// Health check endpoint.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

/// Build the router with all routes.
pub fn router() -> Router {
    Router::new()
        .route("/", get(alive))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
}

/// Serve the health check until `shutdown` completes.
pub async fn serve<F>(addr: SocketAddr, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Health check server listening");
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await
}
