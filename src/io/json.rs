// src/io/json.rs

use crate::physics::kinematics::KinematicsField;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};

#[derive(Serialize)]
struct FieldDocument<'a> {
    plot_label: &'a str,
    #[serde(flatten)]
    field: &'a KinematicsField,
}

/// Whole field as one JSON object. NaN cells come out as `null`.
pub fn write(path: &str, field: &KinematicsField) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    to_writer(&mut writer, field)?;
    writer.flush()
}

pub fn to_writer<W: Write>(writer: W, field: &KinematicsField) -> io::Result<()> {
    let doc = FieldDocument {
        plot_label: field.plot_label(),
        field,
    };
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}
