// src/physics/constants.rs

use crate::model::error::{require_open, require_positive, require_within, ConfigError};
use serde::{Deserialize, Serialize};

// --- 1. PHYSICAL CONSTANTS (CODATA 2018, exact where SI defines them) ---

/// Elementary charge (C)
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;
/// Neutron mass (kg)
pub const NEUTRON_MASS: f64 = 1.674_927_498_04e-27;
/// Reduced Planck constant (J s)
pub const HBAR: f64 = 1.054_571_817e-34;

/// Energy-to-wavevector factor: `k [1/Å] = SE2K * sqrt(E [meV])`.
///
/// ```text
/// k = sqrt(2 m_n E) / ħ,  E = 1e-3 * e * E_meV,  1 Å = 1e-10 m
/// ```
pub fn se2k() -> f64 {
    (2e-3 * ELEMENTARY_CHARGE * NEUTRON_MASS).sqrt() * 1e-10 / HBAR
}

// --- 2. INSTRUMENT DEFAULTS ---

pub const DEFAULT_N_POINTS: usize = 200;
pub const DEFAULT_TANK_HALF_WIDTH: f64 = 30.0;
pub const DEFAULT_MAX_MODQ: f64 = 15.0;
pub const DEFAULT_MAX_INCIDENT_ENERGY: f64 = 100.0;
pub const DEFAULT_MAX_S2: f64 = 100.0;

/// Grid size cap; the field holds several N x N arrays.
pub const MAX_N_POINTS: usize = 2000;

/// Fixed instrument description handed to the engine at construction.
///
/// Two engines with different instruments can coexist; nothing here is
/// global.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Samples per axis of the (ΔE, |Q|) grid
    #[serde(default = "default_n_points")]
    pub n_points: usize,
    /// Half of the angular coverage of the detector tank (degrees)
    #[serde(default = "default_tank_half_width")]
    pub tank_half_width: f64,
    /// Largest |Q| the crosshair may hold (1/Å)
    #[serde(default = "default_max_modq")]
    pub max_modq: f64,
    /// Upper bound accepted for Ei (meV)
    #[serde(default = "default_max_incident_energy")]
    pub max_incident_energy: f64,
    /// Upper bound accepted for |S2| (degrees)
    #[serde(default = "default_max_s2")]
    pub max_s2: f64,
    /// meV -> 1/Å conversion; see [`se2k`]
    #[serde(default = "se2k")]
    pub se2k: f64,
}

fn default_n_points() -> usize {
    DEFAULT_N_POINTS
}
fn default_tank_half_width() -> f64 {
    DEFAULT_TANK_HALF_WIDTH
}
fn default_max_modq() -> f64 {
    DEFAULT_MAX_MODQ
}
fn default_max_incident_energy() -> f64 {
    DEFAULT_MAX_INCIDENT_ENERGY
}
fn default_max_s2() -> f64 {
    DEFAULT_MAX_S2
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            n_points: DEFAULT_N_POINTS,
            tank_half_width: DEFAULT_TANK_HALF_WIDTH,
            max_modq: DEFAULT_MAX_MODQ,
            max_incident_energy: DEFAULT_MAX_INCIDENT_ENERGY,
            max_s2: DEFAULT_MAX_S2,
            se2k: se2k(),
        }
    }
}

impl InstrumentConfig {
    /// Sanity checks for values read from a settings file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_within("n_points", self.n_points as f64, 2.0, MAX_N_POINTS as f64)?;
        require_open("tank_half_width", self.tank_half_width, 0.0, 90.0)?;
        require_positive("max_modq", self.max_modq, f64::MAX)?;
        require_positive("max_incident_energy", self.max_incident_energy, f64::MAX)?;
        require_positive("max_s2", self.max_s2, 180.0)?;
        require_positive("se2k", self.se2k, f64::MAX)
    }
}
