//src/model/mod.rs
pub mod crosshair;
pub mod error;
pub mod experiment;
pub mod lattice;

// Re-exports for cleaner imports
pub use crosshair::{CrosshairPoint, CrosshairState, CrosshairUpdate, ExperimentMode};
pub use error::ConfigError;
pub use experiment::{ExperimentConfiguration, PlotType};
pub use lattice::{reciprocal_length, LatticeParameters};
