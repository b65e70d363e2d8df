// src/physics/mod.rs
pub mod constants;
pub mod kinematics;

pub use constants::InstrumentConfig;
pub use kinematics::{beam_angle, calculate_field, KinematicsField, ScatteringGeometry};
