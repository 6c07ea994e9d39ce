//! waveguide-field: closed-form field patterns for guided electromagnetic waves
//!
//! This crate provides:
//! - Propagation modes (TEM, TE10, TE20, TM11) with legacy alias normalization
//! - Sampled 2-D field grids evaluated analytically per mode
//! - Cutoff frequency and guided wavelength calculators
//! - Display rendering (colour map, PPM export) and plain-text reports
//!
//! Inputs use teaching-friendly units (GHz, cm). Everything is converted
//! to SI before evaluation.

pub mod dispersion;
pub mod error;
pub mod formula;
pub mod grid;
pub mod mode;
pub mod params;
pub mod render;
pub mod report;

pub use dispersion::{
    cutoff_frequency_ghz, free_space_wavelength_cm, guided_wavelength, guided_wavelength_with,
    DispersionInfo, GuidedWavelength, TmHeight,
};
pub use error::{FieldError, FieldResult};
pub use formula::{compute_grid, propagation_constant};
pub use grid::FieldGrid;
pub use mode::Mode;
pub use params::{WaveParameters, DEFAULT_GRID_SIZE};

/// Speed of light in vacuum (m/s), exact by definition
pub const C: f64 = 299_792_458.0;

/// Convert a frequency in GHz to Hz
pub fn ghz_to_hz(frequency_ghz: f64) -> f64 {
    frequency_ghz * 1e9
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthUnit {
    Meter,
    Centimeter,
    Millimeter,
}

impl LengthUnit {
    /// Convert from this unit to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Meter => value,
            LengthUnit::Centimeter => value / 100.0,
            LengthUnit::Millimeter => value / 1000.0,
        }
    }

    /// Convert from meters to this unit
    pub fn from_meters(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Meter => value,
            LengthUnit::Centimeter => value * 100.0,
            LengthUnit::Millimeter => value * 1000.0,
        }
    }

    /// Get scale factor to convert from one unit to another
    pub fn scale_to(&self, target: &LengthUnit) -> f64 {
        target.from_meters(self.to_meters(1.0))
    }
}
