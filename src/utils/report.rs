// src/utils/report.rs

use crate::engine::ScatteringEngine;
use crate::model::{CrosshairPoint, ExperimentMode};
use crate::physics::kinematics::KinematicsField;

/// Text block describing the experiment, crystal and crosshair.
pub fn settings_summary(engine: &ScatteringEngine) -> String {
    let exp = engine.get_experiment();
    let inst = engine.instrument();
    let mut out = String::new();

    out.push_str("Experiment\n");
    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!("{:<12} {:>10.3} meV\n", "Ei", exp.ei));
    out.push_str(&format!("{:<12} {:>10.3} °\n", "S2", exp.s2));
    out.push_str(&format!(
        "{:<12} {:>10} °\n",
        "Tank",
        format!("{:.1}..{:.1}", exp.s2.abs() - inst.tank_half_width, exp.s2.abs() + inst.tank_half_width)
    ));
    out.push_str(&format!("{:<12} {:>10.3} °\n", "alpha_p", exp.alpha_p));
    out.push_str(&format!("{:<12} {:>10}\n", "Plot", exp.plot_type.label()));
    out.push('\n');

    if engine.mode() == ExperimentMode::SingleCrystal {
        let lat = engine.get_lattice();
        out.push_str("Lattice\n");
        out.push_str("--------------------------------------------------\n");
        out.push_str(&format!(
            "a, b, c:      {:.4} {:.4} {:.4} Å\n",
            lat.a, lat.b, lat.c
        ));
        out.push_str(&format!(
            "α, β, γ:      {:.3} {:.3} {:.3} °\n",
            lat.alpha, lat.beta, lat.gamma
        ));
        out.push_str(&format!("(h, k, l):    ({} {} {})\n", lat.h, lat.k, lat.l));
        out.push('\n');
    }

    out.push_str(&crosshair_summary(
        engine.mode(),
        engine.crosshair(),
        engine.beam_angle(),
    ));
    out
}

/// Crosshair position plus the detector angle that reaches it.
pub fn crosshair_summary(mode: ExperimentMode, point: CrosshairPoint, beam_angle: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!("Crosshair ({})\n", mode));
    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!("{:<12} {:>10.4} meV\n", "ΔE", point.delta_e));
    out.push_str(&format!("{:<12} {:>10.4} 1/Å\n", "|Q|", point.mod_q));
    if beam_angle.is_nan() {
        out.push_str(&format!("{:<12} {:>10}\n", "2θ", "unreachable"));
    } else {
        out.push_str(&format!("{:<12} {:>10.3} °\n", "2θ", beam_angle));
    }
    out
}

/// Grid extent and value range of a computed field.
pub fn field_summary(field: &KinematicsField) -> String {
    let (n_q, n_e) = field.shape();
    let e_first = field.energy.iter().next().copied().unwrap_or(f64::NAN);
    let e_last = field.energy.iter().last().copied().unwrap_or(f64::NAN);
    let q_last = field.mod_q.iter().last().copied().unwrap_or(f64::NAN);

    let mut out = String::new();
    out.push_str(&format!("Field: {}\n", field.plot_label()));
    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!("Grid:         {} x {} (|Q| x ΔE)\n", n_q, n_e));
    out.push_str(&format!("ΔE range:     {:.3} .. {:.3} meV\n", e_first, e_last));
    out.push_str(&format!("|Q| range:    0 .. {:.4} 1/Å\n", q_last));
    out.push_str(&format!(
        "Reachable:    {:.1} %\n",
        100.0 * field.reachable_fraction()
    ));
    match field.intensity_range() {
        Some((lo, hi)) => out.push_str(&format!("Values:       {:.4} .. {:.4}\n", lo, hi)),
        None => out.push_str("Values:       none reachable\n"),
    }
    out
}
