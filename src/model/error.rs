// src/model/error.rs

use std::fmt;

/// Rejected configuration input.
///
/// Only malformed *settings* end up here. A geometrically impossible
/// query (scattering triangle that cannot close, degenerate cell) is
/// reported as NaN by the physics layer instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A value was NaN or infinite
    NotFinite { field: &'static str, value: f64 },
    /// A value fell outside its inclusive/exclusive bounds
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// |S2| inside the tank half-width, where the detector side is undefined
    TankOverlapsBeam { s2: f64, half_width: f64 },
    /// Cell angles that cannot close a parallelepiped
    InvalidCellAngles { alpha: f64, beta: f64, gamma: f64 },
    UnknownPlotType(String),
    UnknownMode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::NotFinite { field, value } => {
                write!(f, "{} must be a finite number, got {}", field, value)
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "{} = {} is outside the allowed range [{}, {}]",
                field, value, min, max
            ),
            ConfigError::TankOverlapsBeam { s2, half_width } => write!(
                f,
                "|S2| = {} must be at least the tank half-width {}",
                s2.abs(),
                half_width
            ),
            ConfigError::InvalidCellAngles { alpha, beta, gamma } => write!(
                f,
                "Cell angles ({}, {}, {}) do not describe a valid unit cell",
                alpha, beta, gamma
            ),
            ConfigError::UnknownPlotType(s) => write!(f, "Unknown plot type: {:?}", s),
            ConfigError::UnknownMode(s) => write!(f, "Unknown experiment mode: {:?}", s),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Fails unless `value` is finite.
pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

/// Fails unless `min <= value <= max` (and finite).
pub(crate) fn require_within(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Fails unless `0 < value <= max`.
pub(crate) fn require_positive(field: &'static str, value: f64, max: f64) -> Result<(), ConfigError> {
    require_within(field, value, 0.0, max)?;
    if value == 0.0 {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max,
        });
    }
    Ok(())
}

/// Fails unless `min < value < max`.
pub(crate) fn require_open(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    require_within(field, value, min, max)?;
    if value == min || value == max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_bounds_inclusive() {
        assert!(require_within("x", 0.0, 0.0, 1.0).is_ok());
        assert!(require_within("x", 1.0, 0.0, 1.0).is_ok());
        assert_eq!(
            require_within("x", 1.5, 0.0, 1.0),
            Err(ConfigError::OutOfRange {
                field: "x",
                value: 1.5,
                min: 0.0,
                max: 1.0
            })
        );
    }

    #[test]
    fn test_exclusive_ends() {
        assert!(require_positive("a", 100.0, 100.0).is_ok());
        assert!(require_positive("a", 0.0, 100.0).is_err());
        assert!(require_positive("a", -1.0, 100.0).is_err());

        assert!(require_open("alpha", 90.0, 0.0, 180.0).is_ok());
        assert!(require_open("alpha", 0.0, 0.0, 180.0).is_err());
        assert!(require_open("alpha", 180.0, 0.0, 180.0).is_err());
        assert!(matches!(
            require_open("alpha", f64::INFINITY, 0.0, 180.0),
            Err(ConfigError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_nan_is_not_finite() {
        let err = require_within("Ei", f64::NAN, 0.0, 100.0).unwrap_err();
        assert!(matches!(err, ConfigError::NotFinite { field: "Ei", .. }));
        assert!(err.to_string().contains("Ei"));
    }
}
