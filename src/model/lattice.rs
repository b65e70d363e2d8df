// src/model/lattice.rs

use super::error::{require_open, require_positive, require_within, ConfigError};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const MAX_CELL_LENGTH: f64 = 100.0;
pub const MAX_HKL: f64 = 100.0;

/// Direct-space cell plus the reflection of interest.
///
/// Lengths in Å, angles in degrees, (h, k, l) in r.l.u.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub h: f64,
    pub k: f64,
    pub l: f64,
}

impl Default for LatticeParameters {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            alpha: 90.0,
            beta: 90.0,
            gamma: 90.0,
            h: 0.0,
            k: 0.0,
            l: 0.0,
        }
    }
}

impl LatticeParameters {
    pub fn new(cell: [f64; 6], hkl: [f64; 3]) -> Self {
        Self {
            a: cell[0],
            b: cell[1],
            c: cell[2],
            alpha: cell[3],
            beta: cell[4],
            gamma: cell[5],
            h: hkl[0],
            k: hkl[1],
            l: hkl[2],
        }
    }

    /// Crystallographic B-matrix (Busing & Levy), mapping r.l.u. to
    /// Cartesian reciprocal space without the 2π factor.
    ///
    /// Entries are NaN when the angles cannot form a cell.
    pub fn b_matrix(&self) -> Matrix3<f64> {
        let (sa, ca) = self.alpha.to_radians().sin_cos();
        let (sb, cb) = self.beta.to_radians().sin_cos();
        let (sg, cg) = self.gamma.to_radians().sin_cos();

        // Volume factor; negative radicand -> NaN on purpose
        let vabg = (1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg).sqrt();

        let a_star = sa / (self.a * vabg);
        let b_star = sb / (self.b * vabg);
        let c_star = sg / (self.c * vabg);

        // Reciprocal inter-axial cosines (cos α* is not needed by the
        // upper-triangular form)
        let cos_beta_star = (cg * ca - cb) / (sg * sa);
        let cos_gamma_star = (ca * cb - cg) / (sa * sb);

        Matrix3::new(
            a_star,
            b_star * cos_gamma_star,
            c_star * cos_beta_star,
            0.0,
            b_star * (1.0 - cos_gamma_star * cos_gamma_star).sqrt(),
            -c_star * (1.0 - cos_beta_star * cos_beta_star).sqrt() * ca,
            0.0,
            0.0,
            1.0 / self.c,
        )
    }

    /// |Q| (1/Å) of reflection (h, k, l) for this cell.
    pub fn reciprocal_length(&self) -> f64 {
        let hkl = Vector3::new(self.h, self.k, self.l);
        (2.0 * PI * self.b_matrix() * hkl).norm()
    }

    /// Range and closure checks for values coming from the outside.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("a", self.a), ("b", self.b), ("c", self.c)] {
            require_positive(field, value, MAX_CELL_LENGTH)?;
        }

        for (field, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
        ] {
            require_open(field, value, 0.0, 180.0)?;
        }

        let (al, be, ga) = (self.alpha, self.beta, self.gamma);
        let closes = al < be + ga && be < al + ga && ga < al + be && al + be + ga < 360.0;
        if !closes {
            return Err(ConfigError::InvalidCellAngles {
                alpha: al,
                beta: be,
                gamma: ga,
            });
        }

        for (field, value) in [("h", self.h), ("k", self.k), ("l", self.l)] {
            require_within(field, value, -MAX_HKL, MAX_HKL)?;
        }
        Ok(())
    }
}

/// Free-function form of [`LatticeParameters::reciprocal_length`].
pub fn reciprocal_length(
    a: f64,
    b: f64,
    c: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
    h: f64,
    k: f64,
    l: f64,
) -> f64 {
    LatticeParameters::new([a, b, c, alpha, beta, gamma], [h, k, l]).reciprocal_length()
}
