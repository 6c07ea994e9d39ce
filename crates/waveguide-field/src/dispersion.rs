//! Cutoff frequency and guided wavelength
//!
//! These gate physical validity: a mode propagates only above its cutoff.
//! Geometry is taken in cm, frequency in GHz, wavelengths are returned in cm.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::mode::Mode;
use crate::params::WaveParameters;
use crate::{ghz_to_hz, LengthUnit, C};

/// Guided wavelength, or `Infinite` when the mode does not propagate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuidedWavelength {
    /// Wavelength in cm
    Finite(f64),
    Infinite,
}

impl GuidedWavelength {
    pub fn is_infinite(&self) -> bool {
        matches!(self, GuidedWavelength::Infinite)
    }

    pub fn as_cm(&self) -> Option<f64> {
        match self {
            GuidedWavelength::Finite(cm) => Some(*cm),
            GuidedWavelength::Infinite => None,
        }
    }
}

impl Serialize for GuidedWavelength {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GuidedWavelength::Finite(cm) => serializer.serialize_f64(*cm),
            GuidedWavelength::Infinite => serializer.serialize_str("infinite"),
        }
    }
}

impl fmt::Display for GuidedWavelength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuidedWavelength::Finite(cm) => write!(f, "{:.2} cm", cm),
            GuidedWavelength::Infinite => f.write_str("∞ (cut off)"),
        }
    }
}

/// Height used for the TM11 guided wavelength.
///
/// Historically the TM11 wavelength ignored the supplied height and
/// assumed a guide with b = a/2. `HalfWidth` keeps that behaviour;
/// `Explicit` uses the real height (cm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TmHeight {
    HalfWidth,
    Explicit(f64),
}

impl TmHeight {
    fn resolve(&self, width_cm: f64) -> f64 {
        match self {
            TmHeight::HalfWidth => width_cm / 2.0,
            TmHeight::Explicit(height_cm) => *height_cm,
        }
    }
}

fn cutoff_frequency_hz(mode: Mode, width_cm: f64, height_cm: f64) -> f64 {
    let a = LengthUnit::Centimeter.to_meters(width_cm);
    let b = LengthUnit::Centimeter.to_meters(height_cm);
    match mode {
        Mode::Tem => 0.0,
        Mode::Te10 => C / (2.0 * a),
        Mode::Te20 => C / a,
        Mode::Tm11 => (C / 2.0) * ((1.0 / a).powi(2) + (1.0 / b).powi(2)).sqrt(),
    }
}

/// Cutoff frequency (GHz). Zero for TEM.
pub fn cutoff_frequency_ghz(mode: Mode, width_cm: f64, height_cm: f64) -> f64 {
    cutoff_frequency_hz(mode, width_cm, height_cm) / 1e9
}

/// Free-space wavelength λ0 = C/f (cm)
pub fn free_space_wavelength_cm(frequency_ghz: f64) -> f64 {
    LengthUnit::Centimeter.from_meters(C / ghz_to_hz(frequency_ghz))
}

/// Guided wavelength with the historical TM11 height assumption (b = a/2)
pub fn guided_wavelength(frequency_ghz: f64, width_cm: f64, mode: Mode) -> GuidedWavelength {
    guided_wavelength_with(frequency_ghz, width_cm, mode, TmHeight::HalfWidth)
}

/// Guided wavelength λg = λ0/√(1 − (fc/f)²); `Infinite` at or below cutoff.
/// TEM is dispersionless and returns λ0.
pub fn guided_wavelength_with(
    frequency_ghz: f64,
    width_cm: f64,
    mode: Mode,
    tm_height: TmHeight,
) -> GuidedWavelength {
    let f = ghz_to_hz(frequency_ghz);
    let lambda0 = C / f;

    if mode == Mode::Tem {
        return GuidedWavelength::Finite(LengthUnit::Centimeter.from_meters(lambda0));
    }

    // Only TM11 depends on the height
    let fc = cutoff_frequency_hz(mode, width_cm, tm_height.resolve(width_cm));
    if f <= fc {
        return GuidedWavelength::Infinite;
    }

    let lambda_g = lambda0 / (1.0 - (fc / f).powi(2)).sqrt();
    GuidedWavelength::Finite(LengthUnit::Centimeter.from_meters(lambda_g))
}

/// Dispersion annotation for one parameter set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispersionInfo {
    pub mode: Mode,
    pub cutoff_frequency_ghz: f64,
    pub free_space_wavelength_cm: f64,
    pub guided_wavelength_cm: GuidedWavelength,
    pub propagating: bool,
}

impl DispersionInfo {
    /// Derive the annotation from explicit geometry (TM11 uses the real height)
    pub fn new(mode: Mode, frequency_ghz: f64, width_cm: f64, height_cm: f64) -> Self {
        let guided =
            guided_wavelength_with(frequency_ghz, width_cm, mode, TmHeight::Explicit(height_cm));
        Self {
            mode,
            cutoff_frequency_ghz: cutoff_frequency_ghz(mode, width_cm, height_cm),
            free_space_wavelength_cm: free_space_wavelength_cm(frequency_ghz),
            guided_wavelength_cm: guided,
            propagating: !guided.is_infinite(),
        }
    }

    pub fn from_params(params: &WaveParameters) -> Self {
        Self::new(params.mode, params.frequency_ghz, params.width_cm, params.height_cm)
    }
}
