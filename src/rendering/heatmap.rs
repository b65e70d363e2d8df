// src/rendering/heatmap.rs

use crate::model::CrosshairPoint;
use crate::physics::kinematics::KinematicsField;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;

/// Blue (low) to red (high), linear in `value` over `[lo, hi]`.
fn colour(value: f64, lo: f64, hi: f64) -> HSLColor {
    let t = if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    HSLColor(0.66 * (1.0 - t), 0.85, 0.5)
}

/// Spacing of a uniform axis; 0 for fewer than two samples.
fn step(axis: &[f64]) -> f64 {
    if axis.len() < 2 {
        0.0
    } else {
        (axis[axis.len() - 1] - axis[0]) / (axis.len() - 1) as f64
    }
}

/// Finite (x, y) pairs, so NaN edges do not break the line.
fn finite_points(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect()
}

// --- Draws the field to ANY backend (bitmap or SVG) ---
pub fn draw_field_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    field: &KinematicsField,
    crosshair: Option<CrosshairPoint>,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let energy = field.energy.to_vec();
    let mod_q = field.mod_q.to_vec();

    // 1. Axis ranges
    let q_max = mod_q.iter().copied().fold(0.0, f64::max);
    let q_max = if q_max > 0.0 { q_max } else { 1.0 };
    let (e_min, e_max) = match (energy.first(), energy.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
        _ => (-1.0, 1.0),
    };

    let mut chart = ChartBuilder::on(root)
        .caption(field.plot_label(), ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..q_max, e_min..e_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("|Q| (Å⁻¹)")
        .y_desc("ΔE (meV)")
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    // 2. Cells; unreachable ones stay blank
    if let Some((lo, hi)) = field.intensity_range() {
        let dq = step(&mod_q) / 2.0;
        let de = step(&energy) / 2.0;

        chart.draw_series(
            field
                .intensity
                .indexed_iter()
                .filter(|(_, v)| v.is_finite())
                .map(|((i, j), &v)| {
                    let q = mod_q[i];
                    let e = energy[j];
                    Rectangle::new([(q - dq, e - de), (q + dq, e + de)], colour(v, lo, hi).filled())
                }),
        )?;
    }

    // 3. Tank coverage edges
    let q_low = field.q_low.to_vec();
    let q_hi = field.q_hi.to_vec();
    chart.draw_series(LineSeries::new(finite_points(&q_low, &energy), &BLACK))?;
    chart.draw_series(LineSeries::new(finite_points(&q_hi, &energy), &BLACK))?;

    // 4. Crosshair
    if let Some(point) = crosshair {
        if point.mod_q.is_finite() && point.delta_e.is_finite() {
            chart.draw_series(LineSeries::new(
                vec![(point.mod_q, e_min), (point.mod_q, e_max)],
                &MAGENTA,
            ))?;
            chart.draw_series(LineSeries::new(
                vec![(0.0, point.delta_e), (q_max, point.delta_e)],
                &MAGENTA,
            ))?;
        }
    }

    Ok(())
}

pub fn export_png(
    path: &str,
    field: &KinematicsField,
    crosshair: Option<CrosshairPoint>,
    size: (u32, u32),
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    draw_field_chart(&root, field, crosshair)?;
    root.present()?;
    log::info!("Field image written to {}", path);
    Ok(())
}

pub fn export_svg(
    path: &str,
    field: &KinematicsField,
    crosshair: Option<CrosshairPoint>,
    size: (u32, u32),
) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    draw_field_chart(&root, field, crosshair)?;
    root.present()?;
    log::info!("Field image written to {}", path);
    Ok(())
}
