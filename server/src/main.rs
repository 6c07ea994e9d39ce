//! Waveguide compute server
//! - Field grid evaluation over HTTP
//! - Short-lived fingerprint cache
//! - Dispersion and health endpoints

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod error;
mod routes;
mod service;

use cache::{fingerprint, CacheConfig, FingerprintCache};
use config::ServerConfig;
use routes::AppState;
use service::ComputeService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();

    let cache = Arc::new(FingerprintCache::new(CacheConfig {
        ttl: config.cache_ttl(),
        soft_limit: config.cache_soft_limit,
        key_builder: fingerprint,
    }));
    info!(
        "Cache: ttl={:?}, soft limit={} entries",
        cache.ttl(),
        config.cache_soft_limit
    );

    let state = Arc::new(AppState {
        service: ComputeService::new(cache, config.max_grid_size),
    });
    let app = routes::router(state);

    info!("Server: http://{}", config.bind);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
