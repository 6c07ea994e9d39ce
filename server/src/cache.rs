//! Fingerprint cache: computed grids keyed by a canonical parameter string
//!
//! Entries expire a fixed TTL after creation. Expiry is checked lazily on
//! lookup; there is no background sweep. Concurrent stores for one key are
//! last-write-wins. The cache is local to this process and says nothing
//! about other nodes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use waveguide_field::{DispersionInfo, FieldGrid, WaveParameters};

/// Builds the cache key for a parameter set
pub type KeyBuilder = fn(&WaveParameters) -> String;

/// Canonical key. Time is rounded to two decimals so nearby animation
/// frames share an entry; everything else is kept at full precision.
pub fn fingerprint(params: &WaveParameters) -> String {
    format!(
        "field_{}_{}_{}_{}_{}_{:.2}_{}",
        params.mode.tag(),
        params.frequency_ghz,
        params.amplitude,
        params.width_cm,
        params.height_cm,
        params.time,
        params.grid_size
    )
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    /// Store sweeps expired entries once the map holds this many
    pub soft_limit: usize,
    pub key_builder: KeyBuilder,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10),
            soft_limit: 4096,
            key_builder: fingerprint,
        }
    }
}

/// A computed grid and the parameters that produced it
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub grid: Arc<FieldGrid>,
    pub params: WaveParameters,
    pub dispersion: DispersionInfo,
    /// Wall clock at computation (epoch ms)
    pub timestamp: i64,
    created_at: Instant,
}

impl CacheEntry {
    pub fn new(
        key: String,
        grid: Arc<FieldGrid>,
        params: WaveParameters,
        dispersion: DispersionInfo,
    ) -> Self {
        Self {
            key,
            grid,
            params,
            dispersion,
            timestamp: chrono::Utc::now().timestamp_millis(),
            created_at: Instant::now(),
        }
    }
}

pub struct FingerprintCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    config: CacheConfig,
}

impl FingerprintCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    pub fn key_for(&self, params: &WaveParameters) -> String {
        (self.config.key_builder)(params)
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        entry.created_at.elapsed() >= self.config.ttl
    }

    /// Live entry for `key`. An expired entry is dropped and reported as a miss.
    pub async fn lookup(&self, key: &str) -> Option<CacheEntry> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if !self.is_expired(entry) => return Some(entry.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        // Another task may have refreshed it between the two locks
        match entries.get(key) {
            Some(entry) if !self.is_expired(entry) => Some(entry.clone()),
            Some(_) => {
                entries.remove(key);
                debug!(key, "cache entry expired");
                None
            }
            None => None,
        }
    }

    /// Insert or overwrite the entry under `entry.key`
    pub async fn store(&self, entry: CacheEntry) {
        let mut entries = self.entries.write().await;
        if entries.len() >= self.config.soft_limit {
            let removed = self.sweep(&mut entries);
            debug!(removed, remaining = entries.len(), "swept expired cache entries");
        }
        entries.insert(entry.key.clone(), entry);
    }

    fn sweep(&self, entries: &mut HashMap<String, CacheEntry>) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry));
        before - entries.len()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
