//! Command-line and environment configuration

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "waveguide-server")]
#[command(about = "HTTP compute service for waveguide field patterns")]
#[command(version)]
pub struct ServerConfig {
    /// Listen address
    #[arg(long, env = "WAVEGUIDE_BIND", default_value = "0.0.0.0:3001")]
    pub bind: SocketAddr,

    /// Lifetime of a cached grid in seconds
    #[arg(long, env = "WAVEGUIDE_CACHE_TTL_SECS", default_value = "10")]
    pub cache_ttl_secs: u64,

    /// Entry count above which a store sweeps expired entries first
    #[arg(long, env = "WAVEGUIDE_CACHE_SOFT_LIMIT", default_value = "4096")]
    pub cache_soft_limit: usize,

    /// Largest accepted gridSize
    #[arg(long, env = "WAVEGUIDE_MAX_GRID_SIZE", default_value = "500")]
    pub max_grid_size: usize,
}

impl ServerConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
