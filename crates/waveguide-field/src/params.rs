//! Simulation parameters for a single field evaluation

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldResult};
use crate::mode::Mode;
use crate::{ghz_to_hz, LengthUnit, C};

/// Grid resolution used by interactive views
pub const DEFAULT_GRID_SIZE: usize = 100;

/// Input to one field evaluation. Wire names follow the browser client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveParameters {
    pub mode: Mode,
    /// Operating frequency (GHz)
    #[serde(rename = "frequency")]
    pub frequency_ghz: f64,
    /// Peak field amplitude (arbitrary units)
    pub amplitude: f64,
    /// Broad wall width a (cm); also the outer radius for TEM
    #[serde(rename = "waveguideWidth")]
    pub width_cm: f64,
    /// Narrow wall height b (cm)
    #[serde(rename = "waveguideHeight")]
    pub height_cm: f64,
    /// Time (s)
    pub time: f64,
    /// Samples per side
    #[serde(rename = "gridSize", default = "default_grid_size")]
    pub grid_size: usize,
}

fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

impl Default for WaveParameters {
    fn default() -> Self {
        Self {
            mode: Mode::Te10,
            frequency_ghz: 10.0,
            amplitude: 1.0,
            width_cm: 2.0,
            height_cm: 1.0,
            time: 0.0,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

impl WaveParameters {
    /// Reject out-of-domain input. Nothing is ever replaced by a default.
    pub fn validate(&self) -> FieldResult<()> {
        let finite = [
            ("frequency", self.frequency_ghz),
            ("amplitude", self.amplitude),
            ("waveguideWidth", self.width_cm),
            ("waveguideHeight", self.height_cm),
            ("time", self.time),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(FieldError::InvalidParameter(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        if self.frequency_ghz <= 0.0 {
            return Err(FieldError::InvalidParameter(format!(
                "frequency must be positive, got {} GHz",
                self.frequency_ghz
            )));
        }
        if !self.k0().is_finite() {
            return Err(FieldError::InvalidParameter(format!(
                "frequency {} GHz is out of range",
                self.frequency_ghz
            )));
        }
        if self.width_cm <= 0.0 {
            return Err(FieldError::InvalidParameter(format!(
                "waveguideWidth must be positive, got {} cm",
                self.width_cm
            )));
        }
        if self.height_cm <= 0.0 {
            return Err(FieldError::InvalidParameter(format!(
                "waveguideHeight must be positive, got {} cm",
                self.height_cm
            )));
        }
        if self.grid_size == 0 {
            return Err(FieldError::InvalidParameter(
                "gridSize must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn frequency_hz(&self) -> f64 {
        ghz_to_hz(self.frequency_ghz)
    }

    /// Width a in meters
    pub fn width_m(&self) -> f64 {
        LengthUnit::Centimeter.to_meters(self.width_cm)
    }

    /// Height b in meters
    pub fn height_m(&self) -> f64 {
        LengthUnit::Centimeter.to_meters(self.height_cm)
    }

    /// Angular frequency ω = 2πf (rad/s)
    pub fn omega(&self) -> f64 {
        2.0 * PI * self.frequency_hz()
    }

    /// Free-space wavenumber k0 = ω/C (rad/m)
    pub fn k0(&self) -> f64 {
        self.omega() / C
    }
}
