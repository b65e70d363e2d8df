// src/model/crosshair.rs

use super::error::{require_finite, require_within, ConfigError};
use super::lattice::LatticeParameters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where |Q| of the crosshair comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentMode {
    /// |Q| typed in directly
    Powder,
    /// |Q| derived from the lattice and (h, k, l)
    SingleCrystal,
}

impl Default for ExperimentMode {
    fn default() -> Self {
        ExperimentMode::Powder
    }
}

impl ExperimentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperimentMode::Powder => "powder",
            ExperimentMode::SingleCrystal => "single_crystal",
        }
    }
}

impl fmt::Display for ExperimentMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperimentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "powder" => Ok(ExperimentMode::Powder),
            "single_crystal" | "single-crystal" => Ok(ExperimentMode::SingleCrystal),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// Cursor position handed back to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrosshairPoint {
    /// Energy transfer (meV)
    pub delta_e: f64,
    /// Momentum transfer magnitude (1/Å)
    pub mod_q: f64,
}

/// Sparse update: only the fields that are `Some` are written.
///
/// ```ignore
/// let update = CrosshairUpdate::new().mode(ExperimentMode::Powder).mod_q(1.2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrosshairUpdate {
    pub mode: Option<ExperimentMode>,
    pub delta_e: Option<f64>,
    pub mod_q: Option<f64>,
}

impl CrosshairUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: ExperimentMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn delta_e(mut self, delta_e: f64) -> Self {
        self.delta_e = Some(delta_e);
        self
    }

    pub fn mod_q(mut self, mod_q: f64) -> Self {
        self.mod_q = Some(mod_q);
        self
    }

    pub fn validate(&self, max_modq: f64) -> Result<(), ConfigError> {
        if let Some(delta_e) = self.delta_e {
            require_finite("DeltaE", delta_e)?;
        }
        if let Some(mod_q) = self.mod_q {
            require_within("modQ", mod_q, 0.0, max_modq)?;
        }
        Ok(())
    }
}

/// Crosshair position plus the crystal it may be derived from.
///
/// In [`ExperimentMode::SingleCrystal`] the stored `mod_q` is only a
/// cache of the last in-range value computed from the lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct CrosshairState {
    mode: ExperimentMode,
    delta_e: f64,
    mod_q: f64,
    lattice: LatticeParameters,
}

impl Default for CrosshairState {
    fn default() -> Self {
        Self::new(ExperimentMode::default())
    }
}

impl CrosshairState {
    pub fn new(mode: ExperimentMode) -> Self {
        Self {
            mode,
            delta_e: 0.0,
            mod_q: 0.0,
            lattice: LatticeParameters::default(),
        }
    }

    pub fn mode(&self) -> ExperimentMode {
        self.mode
    }

    /// Stored |Q|, which may lag behind the lattice in crystal mode.
    pub fn stored_mod_q(&self) -> f64 {
        self.mod_q
    }

    pub fn lattice(&self) -> &LatticeParameters {
        &self.lattice
    }

    pub fn set_lattice(&mut self, lattice: LatticeParameters) {
        self.lattice = lattice;
    }

    /// Writes only the supplied fields. No range checks here.
    pub fn set(&mut self, update: CrosshairUpdate) {
        if let Some(mode) = update.mode {
            self.mode = mode;
        }
        if let Some(delta_e) = update.delta_e {
            self.delta_e = delta_e;
        }
        if let Some(mod_q) = update.mod_q {
            self.mod_q = mod_q;
        }
    }

    /// |Q| as callers should see it right now.
    pub fn effective_mod_q(&self) -> f64 {
        match self.mode {
            ExperimentMode::SingleCrystal => self.lattice.reciprocal_length(),
            ExperimentMode::Powder => self.mod_q,
        }
    }

    /// Pure view of the cursor.
    pub fn get(&self) -> CrosshairPoint {
        CrosshairPoint {
            delta_e: self.delta_e,
            mod_q: self.effective_mod_q(),
        }
    }

    /// Caches the lattice-derived |Q| when it is below `max_modq`.
    ///
    /// Returns whether the stored value was overwritten. Out-of-range
    /// (or NaN) values are never stored.
    pub fn refresh(&mut self, max_modq: f64) -> bool {
        if self.mode != ExperimentMode::SingleCrystal {
            return false;
        }
        let computed = self.lattice.reciprocal_length();
        if computed < max_modq {
            self.mod_q = computed;
            true
        } else {
            log::warn!(
                "|Q| = {:.4} from ({}, {}, {}) exceeds {} 1/Å; keeping {:.4}",
                computed,
                self.lattice.h,
                self.lattice.k,
                self.lattice.l,
                max_modq,
                self.mod_q
            );
            false
        }
    }

    /// [`refresh`](Self::refresh) followed by [`get`](Self::get).
    pub fn get_and_refresh(&mut self, max_modq: f64) -> CrosshairPoint {
        self.refresh(max_modq);
        self.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_MODQ: f64 = 15.0;

    #[test]
    fn test_sparse_set() {
        let mut cp = CrosshairState::new(ExperimentMode::Powder);
        cp.set(CrosshairUpdate::new().mode(ExperimentMode::SingleCrystal));
        assert_eq!(cp.mode(), ExperimentMode::SingleCrystal);

        cp.set(CrosshairUpdate::new().delta_e(10.0));
        assert_eq!(cp.get().delta_e, 10.0);

        cp.set(CrosshairUpdate::new().mod_q(1.23));
        assert_eq!(cp.get().delta_e, 10.0);
        assert_eq!(cp.stored_mod_q(), 1.23);
        assert_eq!(cp.mode(), ExperimentMode::SingleCrystal);
    }

    #[test]
    fn test_crystal_mode_overrides_stored_q() {
        let mut cp = CrosshairState::new(ExperimentMode::SingleCrystal);
        cp.set(CrosshairUpdate::new().delta_e(10.0).mod_q(1.23));

        let point = cp.get_and_refresh(MAX_MODQ);
        assert_eq!(point.delta_e, 10.0);
        assert_eq!(point.mod_q, 0.0);
        assert_eq!(cp.stored_mod_q(), 0.0);

        cp.set(
            CrosshairUpdate::new()
                .mode(ExperimentMode::Powder)
                .delta_e(10.0)
                .mod_q(1.23),
        );
        let point = cp.get_and_refresh(MAX_MODQ);
        assert_eq!(point.delta_e, 10.0);
        assert_eq!(point.mod_q, 1.23);
    }

    #[test]
    fn test_out_of_range_q_not_persisted() {
        let mut cp = CrosshairState::new(ExperimentMode::SingleCrystal);
        cp.set_lattice(LatticeParameters::new(
            [1.0, 1.0, 1.0, 90.0, 90.0, 90.0],
            [10.0, 10.0, 10.0],
        ));

        let point = cp.get_and_refresh(MAX_MODQ);
        assert!((point.mod_q - 108.827).abs() < 1e-3);
        assert_eq!(cp.stored_mod_q(), 0.0);
    }

    #[test]
    fn test_get_is_pure() {
        let mut cp = CrosshairState::new(ExperimentMode::SingleCrystal);
        cp.set_lattice(LatticeParameters::new(
            [1.0, 1.0, 1.0, 90.0, 90.0, 90.0],
            [1.0, 0.0, 0.0],
        ));
        let before = cp.clone();
        let point = cp.get();
        assert!((point.mod_q - 2.0 * std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(cp, before);

        assert!(cp.refresh(MAX_MODQ));
        assert!((cp.stored_mod_q() - 2.0 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_powder_refresh_is_noop() {
        let mut cp = CrosshairState::new(ExperimentMode::Powder);
        cp.set(CrosshairUpdate::new().mod_q(2.0));
        assert!(!cp.refresh(MAX_MODQ));
        assert_eq!(cp.stored_mod_q(), 2.0);
    }

    #[test]
    fn test_update_validation() {
        assert!(CrosshairUpdate::new().delta_e(-1.0).mod_q(2.0).validate(MAX_MODQ).is_ok());
        assert!(CrosshairUpdate::new().mod_q(20.0).validate(MAX_MODQ).is_err());
        assert!(CrosshairUpdate::new().mod_q(-2.0).validate(MAX_MODQ).is_err());
        assert!(CrosshairUpdate::new().delta_e(f64::INFINITY).validate(MAX_MODQ).is_err());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("powder".parse::<ExperimentMode>(), Ok(ExperimentMode::Powder));
        assert_eq!("single_crystal".parse::<ExperimentMode>(), Ok(ExperimentMode::SingleCrystal));
        assert!("sc".parse::<ExperimentMode>().is_err());
        assert_eq!(ExperimentMode::SingleCrystal.to_string(), "single_crystal");
    }
}
