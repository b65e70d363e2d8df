// src/lib.rs

//! Planning tool for polarized inelastic neutron scattering on a
//! direct-geometry spectrometer with a movable detector tank.
//!
//! [`engine::ScatteringEngine`] holds the experiment, crosshair and
//! lattice. It answers two questions: which (ΔE, |Q|) region the tank
//! covers, and what the Scharpf angle between Q and the neutron
//! polarization is across that region.

pub mod config;
pub mod engine;
pub mod io;
pub mod model;
pub mod physics;
pub mod rendering;
pub mod utils;

pub use engine::ScatteringEngine;
