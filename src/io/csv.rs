// src/io/csv.rs

use crate::physics::kinematics::KinematicsField;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Long format: one `delta_e,mod_q,<value>` row per grid cell.
///
/// Unreachable cells keep their coordinates and leave the value empty.
pub fn write(path: &str, field: &KinematicsField) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    to_writer(&mut writer, field)?;
    writer.flush()
}

pub fn to_writer<W: Write>(mut writer: W, field: &KinematicsField) -> io::Result<()> {
    writeln!(writer, "delta_e,mod_q,{}", field.plot_label())?;

    for ((i, j), value) in field.intensity.indexed_iter() {
        let e = field.energy[j];
        let q = field.mod_q[i];
        if value.is_finite() {
            writeln!(writer, "{},{},{}", e, q, value)?;
        } else {
            writeln!(writer, "{},{},", e, q)?;
        }
    }
    Ok(())
}
