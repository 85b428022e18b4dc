use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use log::info;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::error::{AppError, Context, Result};
use crate::service::MarketService;

pub mod market;

pub fn app_router(service: Arc<MarketService>) -> Router {
    market::router()
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Bind `config.listen_addr` and serve until the process is stopped.
pub async fn serve(config: &Config, service: Arc<MarketService>) -> Result<()> {
    let addr: SocketAddr = config.listen_addr.parse().map_err(|err| {
        AppError::invalid_input(format!(
            "listen address `{}` is invalid: {}",
            config.listen_addr, err
        ))
    })?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app_router(service))
        .await
        .context("HTTP server terminated")?;
    Ok(())
}
