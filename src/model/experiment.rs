// src/model/experiment.rs

use super::error::{require_positive, require_within, ConfigError};
use crate::physics::constants::InstrumentConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quantity shown on the (ΔE, |Q|) map, derived from cos of the Scharpf angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotType {
    /// Scharpf angle itself, degrees
    Angle,
    CosSquared,
    /// (1 + cos²)/2
    HalfOnePlusCosSquared,
    /// cos² - sin²
    CosSquaredMinusSinSquared,
}

impl Default for PlotType {
    fn default() -> Self {
        PlotType::CosSquared
    }
}

impl PlotType {
    /// Display order is fixed.
    pub const ALL: [PlotType; 4] = [
        PlotType::Angle,
        PlotType::CosSquared,
        PlotType::HalfOnePlusCosSquared,
        PlotType::CosSquaredMinusSinSquared,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlotType::Angle => "α_s",
            PlotType::CosSquared => "cos²α_s",
            PlotType::HalfOnePlusCosSquared => "(1+cos²α_s)/2",
            PlotType::CosSquaredMinusSinSquared => "cos²α_s−sin²α_s",
        }
    }

    pub fn from_label(label: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.label() == label)
            .ok_or_else(|| ConfigError::UnknownPlotType(label.to_string()))
    }

    /// Maps cos(Scharpf angle) to the displayed value. NaN stays NaN.
    pub fn apply(self, cos_angle: f64) -> f64 {
        let c2 = cos_angle * cos_angle;
        match self {
            PlotType::Angle => cos_angle.acos().to_degrees(),
            PlotType::CosSquared => c2,
            PlotType::HalfOnePlusCosSquared => (c2 + 1.0) / 2.0,
            PlotType::CosSquaredMinusSinSquared => c2 - (1.0 - c2),
        }
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the display label or a short ASCII alias.
impl FromStr for PlotType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "angle" | "alpha" => Ok(PlotType::Angle),
            "cos2" | "cos_squared" => Ok(PlotType::CosSquared),
            "half_one_plus_cos2" | "(1+cos2)/2" => Ok(PlotType::HalfOnePlusCosSquared),
            "cos2_minus_sin2" | "cos2-sin2" => Ok(PlotType::CosSquaredMinusSinSquared),
            other => Self::from_label(other),
        }
    }
}

/// Instrument settings. Always replaced as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfiguration {
    /// Incident energy (meV)
    pub ei: f64,
    /// Detector tank centre angle (degrees); sign picks the side of the beam
    pub s2: f64,
    /// Polarization direction in the lab frame (degrees)
    pub alpha_p: f64,
    pub plot_type: PlotType,
}

impl Default for ExperimentConfiguration {
    fn default() -> Self {
        Self {
            ei: 20.0,
            s2: 30.0,
            alpha_p: 0.0,
            plot_type: PlotType::CosSquared,
        }
    }
}

impl ExperimentConfiguration {
    pub fn new(ei: f64, s2: f64, alpha_p: f64, plot_type: PlotType) -> Self {
        Self {
            ei,
            s2,
            alpha_p,
            plot_type,
        }
    }

    pub fn validate(&self, instrument: &InstrumentConfig) -> Result<(), ConfigError> {
        require_positive("Ei", self.ei, instrument.max_incident_energy)?;

        require_within("S2", self.s2, -instrument.max_s2, instrument.max_s2)?;
        if self.s2.abs() < instrument.tank_half_width {
            return Err(ConfigError::TankOverlapsBeam {
                s2: self.s2,
                half_width: instrument.tank_half_width,
            });
        }

        require_within("alpha_p", self.alpha_p, -180.0, 180.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for p in PlotType::ALL {
            assert_eq!(PlotType::from_label(p.label()), Ok(p));
            assert_eq!(p.to_string().parse::<PlotType>(), Ok(p));
        }
        assert!(matches!(
            PlotType::from_label("sin"),
            Err(ConfigError::UnknownPlotType(_))
        ));
    }

    #[test]
    fn test_plot_transforms() {
        let c = 0.5_f64;
        assert!((PlotType::Angle.apply(c) - 60.0).abs() < 1e-12);
        assert!((PlotType::CosSquared.apply(c) - 0.25).abs() < 1e-15);
        assert!((PlotType::HalfOnePlusCosSquared.apply(c) - 0.625).abs() < 1e-15);
        assert!((PlotType::CosSquaredMinusSinSquared.apply(c) + 0.5).abs() < 1e-15);
        for p in PlotType::ALL {
            assert!(p.apply(f64::NAN).is_nan());
        }
    }

    #[test]
    fn test_defaults() {
        let e = ExperimentConfiguration::default();
        assert_eq!(e.ei, 20.0);
        assert_eq!(e.s2, 30.0);
        assert_eq!(e.alpha_p, 0.0);
        assert_eq!(e.plot_type.label(), "cos²α_s");
    }

    #[test]
    fn test_validate() {
        let inst = InstrumentConfig::default();
        assert!(ExperimentConfiguration::default().validate(&inst).is_ok());
        assert!(ExperimentConfiguration::new(30.0, -40.0, -45.0, PlotType::Angle)
            .validate(&inst)
            .is_ok());

        let bad_ei = ExperimentConfiguration::new(303.0, 30.0, 0.0, PlotType::Angle);
        assert!(matches!(
            bad_ei.validate(&inst),
            Err(ConfigError::OutOfRange { field: "Ei", .. })
        ));
        let zero_ei = ExperimentConfiguration::new(0.0, 30.0, 0.0, PlotType::Angle);
        assert!(zero_ei.validate(&inst).is_err());

        let inside_tank = ExperimentConfiguration::new(20.0, -4.0, 0.0, PlotType::Angle);
        assert!(matches!(
            inside_tank.validate(&inst),
            Err(ConfigError::TankOverlapsBeam { .. })
        ));

        let far = ExperimentConfiguration::new(20.0, -450.0, 0.0, PlotType::Angle);
        assert!(matches!(
            far.validate(&inst),
            Err(ConfigError::OutOfRange { field: "S2", .. })
        ));

        let pol = ExperimentConfiguration::new(20.0, 60.0, -450.0, PlotType::Angle);
        assert!(pol.validate(&inst).is_err());
    }
}
