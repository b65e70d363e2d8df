// src/physics/kinematics.rs

use crate::model::crosshair::CrosshairPoint;
use crate::model::experiment::{ExperimentConfiguration, PlotType};
use crate::physics::constants::InstrumentConfig;
use ndarray::{Array1, Array2, Axis, Zip};
use rayon::prelude::*;
use serde::Serialize;

// --- 1. SCATTERING TRIANGLE ---

/// Per-configuration quantities shared by every grid cell.
///
/// Nothing here validates; impossible geometry comes out as NaN.
#[derive(Debug, Clone, Copy)]
pub struct ScatteringGeometry {
    se2k: f64,
    ei: f64,
    /// Incident wavevector (1/Å)
    ki: f64,
    s2_abs: f64,
    half_width: f64,
    /// cos of the outer tank edge, |S2| + half width
    cos_min: f64,
    /// cos of the inner tank edge, |S2| - half width
    cos_max: f64,
    /// Sign of Qx; NaN when |S2| sits inside the half width
    qx_sign: f64,
    px: f64,
    pz: f64,
}

impl ScatteringGeometry {
    pub fn new(instrument: &InstrumentConfig, experiment: &ExperimentConfiguration) -> Self {
        let s2_abs = experiment.s2.abs();
        let half_width = instrument.tank_half_width;
        let (px, pz) = experiment.alpha_p.to_radians().sin_cos();

        Self {
            se2k: instrument.se2k,
            ei: experiment.ei,
            ki: instrument.se2k * experiment.ei.sqrt(),
            s2_abs,
            half_width,
            cos_min: (s2_abs + half_width).to_radians().cos(),
            cos_max: (s2_abs - half_width).to_radians().cos(),
            qx_sign: qx_sign(experiment.s2, half_width),
            px,
            pz,
        }
    }

    pub fn ki(&self) -> f64 {
        self.ki
    }

    /// Final wavevector after losing `delta_e` meV.
    pub fn kf(&self, delta_e: f64) -> f64 {
        self.se2k * (self.ei - delta_e).sqrt()
    }

    /// cos of the angle between ki and kf for the given (ΔE, |Q|).
    pub fn cos_theta(&self, delta_e: f64, mod_q: f64) -> f64 {
        let kf = self.kf(delta_e);
        (self.ki * self.ki + kf * kf - mod_q * mod_q) / (2.0 * self.ki * kf)
    }

    /// True when the scattering angle lands on the detector tank.
    pub fn in_tank(&self, cos_theta: f64) -> bool {
        (self.cos_min..=self.cos_max).contains(&cos_theta)
    }

    /// |Q| at fixed kf for scattering angle `angle` (degrees).
    pub fn q_at_angle(&self, kf: f64, angle: f64) -> f64 {
        (self.ki * self.ki + kf * kf - 2.0 * self.ki * kf * angle.to_radians().cos())
            .abs()
            .sqrt()
    }

    /// cos of the Scharpf angle (between Q and the polarization).
    ///
    /// NaN when the point is not seen by the tank or |Q| = 0.
    pub fn cos_scharpf(&self, delta_e: f64, mod_q: f64) -> f64 {
        let kf = self.kf(delta_e);
        let cos_theta = (self.ki * self.ki + kf * kf - mod_q * mod_q) / (2.0 * self.ki * kf);
        if !self.in_tank(cos_theta) {
            return f64::NAN;
        }

        // Lab frame: z along the beam, x transverse
        let qz = self.ki - kf * cos_theta;
        let qx = self.qx_sign * kf * (1.0 - cos_theta * cos_theta).sqrt();

        (qx * self.px + qz * self.pz) / mod_q
    }

    /// Inner and outer edge of the accessible |Q| at one energy transfer.
    pub fn q_limits(&self, delta_e: f64) -> (f64, f64) {
        let kf = self.kf(delta_e);
        (
            self.q_at_angle(kf, self.s2_abs - self.half_width),
            self.q_at_angle(kf, self.s2_abs + self.half_width),
        )
    }
}

/// Transverse direction of Q: detector on the left flips it.
fn qx_sign(s2: f64, half_width: f64) -> f64 {
    if s2 >= half_width {
        -1.0
    } else if s2 <= -half_width {
        1.0
    } else {
        f64::NAN
    }
}

// --- 2. FIELD ---

/// Everything a plot of the accessible (ΔE, |Q|) region needs.
///
/// 2D arrays are `[n_q, n_e]`: row `i` is `mod_q[i]`, column `j` is
/// `energy[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KinematicsField {
    /// Energy-transfer axis (meV)
    pub energy: Array1<f64>,
    pub q_low: Array1<f64>,
    pub q_hi: Array1<f64>,
    /// |Q| axis (1/Å)
    pub mod_q: Array1<f64>,
    pub q2d: Array2<f64>,
    pub e2d: Array2<f64>,
    /// Selected quantity; NaN outside the tank coverage
    pub intensity: Array2<f64>,
    pub plot_type: PlotType,
}

impl KinematicsField {
    pub fn plot_label(&self) -> &'static str {
        self.plot_type.label()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.intensity.dim()
    }

    /// Fraction of grid cells with a finite value.
    pub fn reachable_fraction(&self) -> f64 {
        let total = self.intensity.len();
        if total == 0 {
            return 0.0;
        }
        let finite = self.intensity.iter().filter(|v| v.is_finite()).count();
        finite as f64 / total as f64
    }

    /// (min, max) over finite cells, None if every cell is NaN.
    pub fn intensity_range(&self) -> Option<(f64, f64)> {
        self.intensity
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Energy-transfer axis from the lower display bound up to 0.9·Ei.
///
/// The lower bound is -Ei, pushed to 1.2·ΔE when the crosshair sits at
/// or below -Ei so the cursor stays on the plot.
pub fn energy_axis(n_points: usize, ei: f64, crosshair_delta_e: f64) -> Array1<f64> {
    let e_min = if crosshair_delta_e <= -ei {
        1.2 * crosshair_delta_e
    } else {
        -ei
    };
    Array1::linspace(e_min, 0.9 * ei, n_points)
}

/// Q_low(E), Q_hi(E) along `energy`.
pub fn boundaries(geometry: &ScatteringGeometry, energy: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
    let limits = energy.mapv(|e| geometry.q_limits(e));
    (limits.mapv(|(lo, _)| lo), limits.mapv(|(_, hi)| hi))
}

/// Full (ΔE, |Q|) map for one experiment configuration.
///
/// # Algorithm
/// 1. ΔE axis via [`energy_axis`], boundary curves via [`boundaries`]
/// 2. |Q| axis from 0 to max(Q_hi)
/// 3. Each cell: close the triangle, mask by tank acceptance, project
///    Q on the polarization, apply the plot transform
pub fn calculate_field(
    instrument: &InstrumentConfig,
    experiment: &ExperimentConfiguration,
    crosshair_delta_e: f64,
) -> KinematicsField {
    let n = instrument.n_points;
    let geometry = ScatteringGeometry::new(instrument, experiment);
    let plot_type = experiment.plot_type;

    let energy = energy_axis(n, experiment.ei, crosshair_delta_e);
    let (q_low, q_hi) = boundaries(&geometry, &energy);

    // f64::max skips NaN
    let q_max = q_hi.iter().copied().fold(0.0, f64::max);
    let mod_q = Array1::linspace(0.0, q_max, n);

    let n_e = energy.len();
    let n_q = mod_q.len();
    let e2d = Array2::from_shape_fn((n_q, n_e), |(_, j)| energy[j]);
    let q2d = Array2::from_shape_fn((n_q, n_e), |(i, _)| mod_q[i]);

    // Rows are independent; split them across threads
    let mut intensity = Array2::from_elem((n_q, n_e), f64::NAN);
    intensity
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let q = mod_q[i];
            Zip::from(&mut row).and(&energy).for_each(|cell, &e| {
                *cell = plot_type.apply(geometry.cos_scharpf(e, q));
            });
        });

    log::debug!(
        "field {}x{}: ΔE [{:.3}, {:.3}] meV, |Q| [0, {:.4}] 1/Å, {}",
        n_q,
        n_e,
        energy.iter().next().copied().unwrap_or(f64::NAN),
        energy.iter().last().copied().unwrap_or(f64::NAN),
        q_max,
        plot_type
    );

    KinematicsField {
        energy,
        q_low,
        q_hi,
        mod_q,
        q2d,
        e2d,
        intensity,
        plot_type,
    }
}

/// Signed scattering angle (degrees) that puts the crosshair on the
/// detector, negative for S2 < 0. NaN when the triangle cannot close.
pub fn beam_angle(
    instrument: &InstrumentConfig,
    experiment: &ExperimentConfiguration,
    crosshair: CrosshairPoint,
) -> f64 {
    let geometry = ScatteringGeometry::new(instrument, experiment);
    let cos_theta = geometry.cos_theta(crosshair.delta_e, crosshair.mod_q);
    let sign = if experiment.s2 < 0.0 { -1.0 } else { 1.0 };
    sign * cos_theta.acos().to_degrees()
}
