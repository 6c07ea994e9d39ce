//! Compute service: validate, consult the cache, evaluate on a miss
//!
//! A request goes Received -> Validated -> either CacheHit -> Respond or
//! CacheMiss -> Computed -> Stored -> Respond, or ends Rejected.
//!
//! Two concurrent misses for the same fingerprint both compute and both
//! store; the later store wins. Evaluation is cheap and idempotent, so no
//! in-flight deduplication is done.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Number;
use tracing::{debug, info};
use waveguide_field::{compute_grid, DispersionInfo, FieldGrid, Mode, WaveParameters, DEFAULT_GRID_SIZE};

use crate::cache::{CacheEntry, FingerprintCache};
use crate::error::ServiceError;

/// Compute request body, kept as received so it can be echoed back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequest {
    pub mode: String,
    pub frequency: f64,
    pub amplitude: f64,
    pub waveguide_width: f64,
    pub waveguide_height: f64,
    pub time: f64,
    /// Any JSON number; integral floats such as `4.0` are accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<Number>,
}

/// Dispersion request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispersionRequest {
    pub mode: String,
    pub frequency: f64,
    pub waveguide_width: f64,
    pub waveguide_height: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeResponse {
    pub field_data: Arc<FieldGrid>,
    pub params: ComputeRequest,
    pub dispersion: DispersionInfo,
    /// When the grid was computed (epoch ms)
    pub timestamp: i64,
    pub cached: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_header(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

#[derive(Debug)]
pub struct ComputeOutcome {
    pub response: ComputeResponse,
    pub cache_status: CacheStatus,
}

pub struct ComputeService {
    cache: Arc<FingerprintCache>,
    max_grid_size: usize,
}

impl ComputeService {
    pub fn new(cache: Arc<FingerprintCache>, max_grid_size: usize) -> Self {
        Self { cache, max_grid_size }
    }

    /// Parse a raw JSON body and serve it
    pub async fn handle(&self, body: &[u8]) -> Result<ComputeOutcome, ServiceError> {
        let request: ComputeRequest = parse_body(body)?;
        self.handle_request(request).await
    }

    pub async fn handle_request(&self, request: ComputeRequest) -> Result<ComputeOutcome, ServiceError> {
        let params = self.validate(&request)?;
        let key = self.cache.key_for(&params);

        if let Some(entry) = self.cache.lookup(&key).await {
            debug!(key = %entry.key, mode = %entry.params.mode, "cache hit");
            return Ok(ComputeOutcome {
                response: respond(&entry, request, true),
                cache_status: CacheStatus::Hit,
            });
        }

        let grid = compute_grid(&params)?;
        let dispersion = DispersionInfo::from_params(&params);
        if grid.is_evanescent() {
            info!(
                mode = %params.mode,
                frequency_ghz = params.frequency_ghz,
                cutoff_ghz = dispersion.cutoff_frequency_ghz,
                "computed below cutoff"
            );
        }

        let entry = CacheEntry::new(key, Arc::new(grid), params, dispersion);
        let response = respond(&entry, request, false);
        debug!(key = %entry.key, size = entry.grid.size(), "cache miss, stored");
        self.cache.store(entry).await;

        Ok(ComputeOutcome {
            response,
            cache_status: CacheStatus::Miss,
        })
    }

    /// Dispersion annotation without evaluating a grid
    pub fn dispersion(&self, body: &[u8]) -> Result<DispersionInfo, ServiceError> {
        let request: DispersionRequest = parse_body(body)?;
        let params = WaveParameters {
            mode: request.mode.parse()?,
            frequency_ghz: request.frequency,
            width_cm: request.waveguide_width,
            height_cm: request.waveguide_height,
            ..Default::default()
        };
        params.validate()?;
        Ok(DispersionInfo::from_params(&params))
    }

    fn validate(&self, request: &ComputeRequest) -> Result<WaveParameters, ServiceError> {
        let mode: Mode = request.mode.parse()?;

        let grid_size = match &request.grid_size {
            None => DEFAULT_GRID_SIZE as i64,
            Some(n) => whole_number(n).ok_or_else(|| {
                ServiceError::InvalidParameter(format!("gridSize must be a whole number, got {}", n))
            })?,
        };
        if grid_size <= 0 {
            return Err(ServiceError::InvalidParameter(format!(
                "gridSize must be positive, got {}",
                grid_size
            )));
        }
        if grid_size as u64 > self.max_grid_size as u64 {
            return Err(ServiceError::InvalidParameter(format!(
                "gridSize {} exceeds the maximum of {}",
                grid_size, self.max_grid_size
            )));
        }

        let params = WaveParameters {
            mode,
            frequency_ghz: request.frequency,
            amplitude: request.amplitude,
            width_cm: request.waveguide_width,
            height_cm: request.waveguide_height,
            time: request.time,
            grid_size: grid_size as usize,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Integer value of a JSON number, if it has no fractional part.
/// Out-of-range floats saturate and are caught by the size limit.
fn whole_number(n: &Number) -> Option<i64> {
    n.as_i64()
        .or_else(|| n.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64))
}

fn parse_body<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, ServiceError> {
    serde_json::from_slice(body).map_err(|e| ServiceError::InvalidParameter(e.to_string()))
}

fn respond(entry: &CacheEntry, params: ComputeRequest, cached: bool) -> ComputeResponse {
    ComputeResponse {
        field_data: entry.grid.clone(),
        params,
        dispersion: entry.dispersion.clone(),
        timestamp: entry.timestamp,
        cached,
    }
}
