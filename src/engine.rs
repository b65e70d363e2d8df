// src/engine.rs

use crate::config::Config;
use crate::model::{
    ConfigError, CrosshairPoint, CrosshairState, CrosshairUpdate, ExperimentConfiguration,
    ExperimentMode, LatticeParameters,
};
use crate::physics::constants::InstrumentConfig;
use crate::physics::kinematics::{self, KinematicsField};

/// Owns the current settings and answers every planning query.
///
/// Setters validate and leave the state untouched on error. Query
/// results that are geometrically impossible come back as NaN.
#[derive(Debug, Clone)]
pub struct ScatteringEngine {
    instrument: InstrumentConfig,
    experiment: ExperimentConfiguration,
    crosshair: CrosshairState,
}

impl Default for ScatteringEngine {
    fn default() -> Self {
        Self::new(InstrumentConfig::default())
    }
}

impl ScatteringEngine {
    /// Engine with the stock experiment, lattice and crosshair.
    pub fn new(instrument: InstrumentConfig) -> Self {
        Self {
            instrument,
            experiment: ExperimentConfiguration::default(),
            crosshair: CrosshairState::new(ExperimentMode::default()),
        }
    }

    /// Engine seeded from the user configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut engine = Self::new(config.instrument);
        engine.experiment = config.experiment;
        engine.crosshair = CrosshairState::new(config.default_mode);
        engine.crosshair.set_lattice(config.lattice);
        engine.crosshair.set(
            CrosshairUpdate::new()
                .delta_e(config.crosshair.delta_e)
                .mod_q(config.crosshair.mod_q),
        );
        Ok(engine)
    }

    pub fn instrument(&self) -> &InstrumentConfig {
        &self.instrument
    }

    // --- Experiment (atomic) ---

    pub fn set_experiment(&mut self, experiment: ExperimentConfiguration) -> Result<(), ConfigError> {
        if let Err(e) = experiment.validate(&self.instrument) {
            log::warn!("Rejected experiment settings: {}", e);
            return Err(e);
        }
        self.experiment = experiment;
        Ok(())
    }

    pub fn get_experiment(&self) -> ExperimentConfiguration {
        self.experiment
    }

    // --- Crosshair (sparse) ---

    pub fn set_crosshair(&mut self, update: CrosshairUpdate) -> Result<(), ConfigError> {
        if let Err(e) = update.validate(self.instrument.max_modq) {
            log::warn!("Rejected crosshair update: {}", e);
            return Err(e);
        }
        self.crosshair.set(update);
        Ok(())
    }

    /// Current cursor, caching a lattice-derived |Q| when it is in range.
    pub fn get_crosshair(&mut self) -> CrosshairPoint {
        self.crosshair.get_and_refresh(self.instrument.max_modq)
    }

    /// Current cursor without touching the stored |Q|.
    pub fn crosshair(&self) -> CrosshairPoint {
        self.crosshair.get()
    }

    pub fn crosshair_state(&self) -> &CrosshairState {
        &self.crosshair
    }

    pub fn mode(&self) -> ExperimentMode {
        self.crosshair.mode()
    }

    // --- Lattice ---

    pub fn set_lattice(&mut self, lattice: LatticeParameters) -> Result<(), ConfigError> {
        if let Err(e) = lattice.validate() {
            log::warn!("Rejected lattice: {}", e);
            return Err(e);
        }
        self.crosshair.set_lattice(lattice);
        Ok(())
    }

    pub fn get_lattice(&self) -> LatticeParameters {
        *self.crosshair.lattice()
    }

    // --- Queries ---

    pub fn calculate_field(&self) -> KinematicsField {
        kinematics::calculate_field(&self.instrument, &self.experiment, self.crosshair.get().delta_e)
    }

    /// Signed scattering angle of the crosshair; NaN if unreachable.
    pub fn beam_angle(&self) -> f64 {
        kinematics::beam_angle(&self.instrument, &self.experiment, self.crosshair.get())
    }
}
