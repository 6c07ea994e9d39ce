//! Waveguide propagation modes and legacy tag normalization

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Supported propagation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    /// Coaxial line, no geometric cutoff
    Tem,
    Te10,
    Te20,
    Tm11,
}

/// Every accepted tag, canonical and legacy, mapped to its mode.
/// "te" and "tm" predate the indexed tags and mean the lowest order mode.
const TAGS: &[(&str, Mode)] = &[
    ("tem", Mode::Tem),
    ("te10", Mode::Te10),
    ("te20", Mode::Te20),
    ("tm11", Mode::Tm11),
    ("te", Mode::Te10),
    ("tm", Mode::Tm11),
];

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Tem, Mode::Te10, Mode::Te20, Mode::Tm11];

    /// Canonical lowercase tag, as used on the wire and in cache keys
    pub fn tag(&self) -> &'static str {
        match self {
            Mode::Tem => "tem",
            Mode::Te10 => "te10",
            Mode::Te20 => "te20",
            Mode::Tm11 => "tm11",
        }
    }

    /// Display label ("TE10")
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Tem => "TEM",
            Mode::Te10 => "TE10",
            Mode::Te20 => "TE20",
            Mode::Tm11 => "TM11",
        }
    }

    /// Mode indices (m, n)
    pub fn indices(&self) -> (u32, u32) {
        match self {
            Mode::Tem => (0, 0),
            Mode::Te10 => (1, 0),
            Mode::Te20 => (2, 0),
            Mode::Tm11 => (1, 1),
        }
    }

    /// Cutoff wavenumber kc (rad/m) for a guide of `a` × `b` meters.
    /// TEM has no geometric cutoff.
    pub fn cutoff_wavenumber(&self, a: f64, b: f64) -> f64 {
        use std::f64::consts::PI;
        match self {
            Mode::Tem => 0.0,
            Mode::Te10 => PI / a,
            Mode::Te20 => 2.0 * PI / a,
            Mode::Tm11 => PI * ((1.0 / a).powi(2) + (1.0 / b).powi(2)).sqrt(),
        }
    }
}

impl FromStr for Mode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        TAGS.iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, mode)| *mode)
            .ok_or_else(|| {
                FieldError::InvalidParameter(format!(
                    "unknown mode '{}': use tem, te10, te20 or tm11 (aliases: te, tm)",
                    s
                ))
            })
    }
}

impl TryFrom<String> for Mode {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.tag().to_string()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_aliases() {
        assert_eq!("te".parse::<Mode>().unwrap(), Mode::Te10);
        assert_eq!("tm".parse::<Mode>().unwrap(), Mode::Tm11);
        assert_eq!("TE20".parse::<Mode>().unwrap(), Mode::Te20);
        assert_eq!(" tem ".parse::<Mode>().unwrap(), Mode::Tem);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = "te01".parse::<Mode>().unwrap_err();
        assert!(matches!(err, FieldError::InvalidParameter(_)));
        assert!(err.to_string().contains("te01"));
    }

    #[test]
    fn test_serde_uses_canonical_tag() {
        let mode: Mode = serde_json::from_str("\"tm\"").unwrap();
        assert_eq!(mode, Mode::Tm11);
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"tm11\"");
        assert!(serde_json::from_str::<Mode>("\"te30\"").is_err());
    }

    #[test]
    fn test_indices() {
        assert_eq!(Mode::Tem.indices(), (0, 0));
        assert_eq!(Mode::Te10.indices(), (1, 0));
        assert_eq!(Mode::Te20.indices(), (2, 0));
        assert_eq!(Mode::Tm11.indices(), (1, 1));
    }

    #[test]
    fn test_cutoff_wavenumber() {
        let a = 0.02;
        assert_eq!(Mode::Tem.cutoff_wavenumber(a, 0.01), 0.0);
        let te10 = Mode::Te10.cutoff_wavenumber(a, 0.01);
        let te20 = Mode::Te20.cutoff_wavenumber(a, 0.01);
        assert!((te20 - 2.0 * te10).abs() < 1e-9);
        assert!(Mode::Tm11.cutoff_wavenumber(a, 0.01) > te20);
    }
}
