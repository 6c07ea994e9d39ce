//! Closed-form field evaluation per propagation mode
//!
//! Transverse sample x = (i/N)·a, longitudinal sample z = (j/N)·b·5. The
//! longitudinal window spans five times the guide height; it is a display
//! window, not a physical period.
//!
//! Below cutoff β = √(k0² − kc²) is NaN and every sample inherits it.
//! That is the evanescent signal and is returned unchanged.

use std::f64::consts::PI;

use tracing::debug;

use crate::error::{FieldError, FieldResult};
use crate::grid::FieldGrid;
use crate::mode::Mode;
use crate::params::WaveParameters;

/// Length of the longitudinal window in units of the transverse extent
const WINDOW_SPAN: f64 = 5.0;

/// Keeps the TEM radial term finite at r = 0 (m)
const TEM_RADIAL_OFFSET: f64 = 0.01;

/// Propagation constant β (rad/m). NaN below cutoff, k0 for TEM.
pub fn propagation_constant(params: &WaveParameters) -> f64 {
    let k0 = params.k0();
    match params.mode {
        Mode::Tem => k0,
        mode => {
            let kc = mode.cutoff_wavenumber(params.width_m(), params.height_m());
            (k0 * k0 - kc * kc).sqrt()
        }
    }
}

/// Evaluate the field of `params.mode` on a `grid_size` × `grid_size` grid
pub fn compute_grid(params: &WaveParameters) -> FieldResult<FieldGrid> {
    params.validate()?;

    let beta = propagation_constant(params);
    if beta.is_nan() {
        debug!(
            mode = %params.mode,
            frequency_ghz = params.frequency_ghz,
            "below cutoff, field is evanescent"
        );
    }

    let grid = match params.mode {
        Mode::Tem => tem_field(params),
        Mode::Te10 | Mode::Te20 => te_m0_field(params, beta),
        Mode::Tm11 => tm11_field(params, beta),
    };

    // A propagating mode must not overflow; below cutoff NaN is expected.
    if !beta.is_nan() {
        if let Some((i, j)) = grid.first_non_finite() {
            return Err(FieldError::Compute(format!(
                "{} sample at ({}, {}) is not finite for a propagating wave (amplitude {})",
                params.mode, i, j, params.amplitude
            )));
        }
    }

    Ok(grid)
}

/// TEm0: Ey = A·sin(mπx/a)·cos(ωt − βz)
fn te_m0_field(params: &WaveParameters, beta: f64) -> FieldGrid {
    let (m, _) = params.mode.indices();
    let m = m as f64;
    let n = params.grid_size as f64;
    let a = params.width_m();
    let b = params.height_m();
    let omega_t = params.omega() * params.time;
    let amplitude = params.amplitude;

    FieldGrid::from_fn(params.grid_size, |i, j| {
        let x = (i as f64 / n) * a;
        let z = (j as f64 / n) * b * WINDOW_SPAN;
        amplitude * (m * PI * x / a).sin() * (omega_t - beta * z).cos()
    })
}

/// TM11: Ez = A·sin(πx/a)·sin(πz/(5b))·cos(ωt − βz)
fn tm11_field(params: &WaveParameters, beta: f64) -> FieldGrid {
    let n = params.grid_size as f64;
    let a = params.width_m();
    let b = params.height_m();
    let span = b * WINDOW_SPAN;
    let omega_t = params.omega() * params.time;
    let amplitude = params.amplitude;

    FieldGrid::from_fn(params.grid_size, |i, j| {
        let x = (i as f64 / n) * a;
        let z = (j as f64 / n) * span;
        amplitude * (PI * x / a).sin() * (PI * z / span).sin() * (omega_t - beta * z).cos()
    })
}

/// TEM (coaxial): Er = A/(r + 0.01)·cos(ωt − k0z), window scaled by a
fn tem_field(params: &WaveParameters) -> FieldGrid {
    let n = params.grid_size as f64;
    let a = params.width_m();
    let k0 = params.k0();
    let omega_t = params.omega() * params.time;
    let amplitude = params.amplitude;

    FieldGrid::from_fn(params.grid_size, |i, j| {
        let r = (i as f64 / n) * a;
        let z = (j as f64 / n) * a * WINDOW_SPAN;
        amplitude * (1.0 / (r + TEM_RADIAL_OFFSET)) * (omega_t - k0 * z).cos()
    })
}
