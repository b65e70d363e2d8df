// src/io/mod.rs
pub mod csv;
pub mod json;

use crate::physics::kinematics::KinematicsField;
use std::io;

pub fn save_field(path: &str, field: &KinematicsField) -> io::Result<()> {
    let p = path.to_lowercase();

    if p.ends_with(".csv") {
        csv::write(path, field)
    } else {
        // .json and anything unrecognised
        json::write(path, field)
    }
}
