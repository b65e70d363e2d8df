// src/config.rs

use crate::model::{
  ConfigError, CrosshairUpdate, ExperimentConfiguration, ExperimentMode, LatticeParameters,
};
use crate::physics::constants::InstrumentConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub const DEFAULT_HELP_URL: &str =
  "https://github.com/neutrons/HyspecPlanningTools/blob/next/README.md";

// --- Crosshair defaults ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosshairDefaults {
  pub delta_e: f64,
  pub mod_q: f64,
}

impl Default for CrosshairDefaults {
  fn default() -> Self {
    Self {
      delta_e: 0.0,
      mod_q: 0.0,
    }
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  #[serde(default)]
  pub instrument: InstrumentConfig,

  #[serde(default)]
  pub default_mode: ExperimentMode,

  #[serde(default)]
  pub experiment: ExperimentConfiguration,

  #[serde(default)]
  pub crosshair: CrosshairDefaults,

  #[serde(default)]
  pub lattice: LatticeParameters,

  #[serde(default = "default_help_url")]
  pub help_url: String,

  #[serde(default)]
  pub verbose_logging: bool,
}

fn default_help_url() -> String {
  DEFAULT_HELP_URL.to_string()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      instrument: InstrumentConfig::default(),
      default_mode: ExperimentMode::Powder,
      experiment: ExperimentConfiguration::default(),
      crosshair: CrosshairDefaults::default(),
      lattice: LatticeParameters::default(),
      help_url: default_help_url(),
      verbose_logging: false,
    }
  }
}

impl Config {
  /// Loads config from the standard OS location (e.g. ~/.config/hyspecppt/settings.json)
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  /// Reads `path`, creating it from defaults when absent.
  ///
  /// An existing file is written back after parsing so that keys
  /// introduced by newer versions show up in it.
  pub fn load_from(path: &Path) -> (Self, String) {
    let (cfg, msg) = if path.exists() {
      match File::open(path) {
        Ok(file) => {
          let reader = BufReader::new(file);
          match serde_json::from_reader::<_, Config>(reader) {
            Ok(cfg) => {
              let msg = match cfg.write_json(path) {
                Ok(()) => format!("Config loaded from {:?}", path),
                Err(e) => format!("Config loaded from {:?} (could not update: {})", path, e),
              };
              (cfg, msg)
            }
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          }
        }
        Err(e) => (Self::default(), format!("Error opening config: {}", e)),
      }
    } else {
      let cfg = Self::default();
      let msg = match cfg.write_json(path) {
        Ok(()) => format!("No config found. Defaults written to {:?}", path),
        Err(e) => format!("No config found. Using defaults ({})", e),
      };
      (cfg, msg)
    };

    if msg.starts_with("Error") {
      log::error!("{}", msg);
    } else {
      log::info!("{}", msg);
    }
    (cfg, msg)
  }

  /// Saves config to the standard OS location
  pub fn save(&self) -> String {
    self.save_to(&Self::get_path())
  }

  pub fn save_to(&self, path: &Path) -> String {
    let msg = match self.write_json(path) {
      Ok(()) => format!("Config saved to {:?}", path),
      Err(e) => format!("Failed to save config: {}", e),
    };
    log::info!("{}", msg);
    msg
  }

  fn write_json(&self, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
      }
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, self)?;
    Ok(())
  }

  /// Checks the stored defaults with the same rules as the engine setters.
  pub fn validate(&self) -> Result<(), ConfigError> {
    self.instrument.validate()?;
    self.experiment.validate(&self.instrument)?;
    self.lattice.validate()?;
    CrosshairUpdate::new()
      .delta_e(self.crosshair.delta_e)
      .mod_q(self.crosshair.mod_q)
      .validate(self.instrument.max_modq)
  }

  pub fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "neutrons", "hyspecppt") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
