//! Liveness endpoint for the hosting platform's health check

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tracing::info;

pub const HEALTH_BODY: &str = "TradeBuddy is running";

/// GET / - fixed body, always 200
pub async fn root() -> &'static str {
    HEALTH_BODY
}

pub fn router() -> Router {
    Router::new().route("/", get(root))
}

/// Serve the liveness route on 0.0.0.0:`port` until the process exits
pub async fn serve(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind health endpoint on {}", addr))?;

    info!("Health endpoint listening on http://{}", addr);
    axum::serve(listener, router()).await?;
    Ok(())
}
