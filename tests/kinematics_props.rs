//! Property-based tests for the planning engine using proptest.
//!
//! Covers: mirror symmetry of the field, the cos² + sin² identity,
//! idempotence, experiment round-trip, cubic reciprocal lengths.

use hyspecppt::model::{
    reciprocal_length, CrosshairPoint, CrosshairUpdate, ExperimentConfiguration,
    LatticeParameters, PlotType,
};
use hyspecppt::physics::constants::InstrumentConfig;
use hyspecppt::physics::kinematics::{beam_angle, calculate_field};
use hyspecppt::ScatteringEngine;
use proptest::prelude::*;

fn small_instrument() -> InstrumentConfig {
    let mut inst = InstrumentConfig::default();
    inst.n_points = 40;
    inst
}

fn same_or_both_nan(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn any_plot_type() -> impl Strategy<Value = PlotType> {
    prop_oneof![
        Just(PlotType::Angle),
        Just(PlotType::CosSquared),
        Just(PlotType::HalfOnePlusCosSquared),
        Just(PlotType::CosSquaredMinusSinSquared),
    ]
}

/// Tank angles the validator accepts: 30 <= |S2| <= 100.
fn valid_s2() -> impl Strategy<Value = f64> {
    (30.0f64..=100.0, any::<bool>()).prop_map(|(s, neg)| if neg { -s } else { s })
}

// ── Field Symmetry ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Mirroring the tank and the polarization together is invisible.
    #[test]
    fn double_sign_flip_leaves_field_unchanged(
        ei in 1.0f64..100.0,
        s2 in valid_s2(),
        alpha_p in -180.0f64..180.0,
        plot_type in any_plot_type(),
    ) {
        let inst = small_instrument();
        let a = calculate_field(&inst, &ExperimentConfiguration::new(ei, s2, alpha_p, plot_type), 0.0);
        let b = calculate_field(&inst, &ExperimentConfiguration::new(ei, -s2, -alpha_p, plot_type), 0.0);

        prop_assert_eq!(&a.mod_q, &b.mod_q);
        for (x, y) in a.intensity.iter().zip(b.intensity.iter()) {
            prop_assert!(same_or_both_nan(*x, *y), "{} vs {}", x, y);
        }
    }

    /// At a diagonal polarization the two tank sides see cos² and sin².
    /// The sum is 2(Qx²Px² + Qz²Pz²)/Q², which equals 1 only when Px² = Pz².
    #[test]
    fn single_flip_is_complementary_at_diagonal_polarization(
        ei in 1.0f64..100.0,
        s2 in valid_s2(),
        alpha_p in prop_oneof![Just(45.0f64), Just(-45.0), Just(135.0), Just(-135.0)],
    ) {
        let inst = small_instrument();
        let a = calculate_field(&inst, &ExperimentConfiguration::new(ei, s2, alpha_p, PlotType::CosSquared), 0.0);
        let b = calculate_field(&inst, &ExperimentConfiguration::new(ei, -s2, alpha_p, PlotType::CosSquared), 0.0);

        let mut checked = 0usize;
        for (x, y) in a.intensity.iter().zip(b.intensity.iter()) {
            if x.is_finite() && y.is_finite() {
                prop_assert!((x + y - 1.0).abs() < 1e-9, "{} + {} != 1", x, y);
                checked += 1;
            }
        }
        prop_assert!(checked > 0);
    }

    /// No hidden state: same inputs, bitwise the same field.
    #[test]
    fn calculate_field_is_idempotent(
        ei in 1.0f64..100.0,
        s2 in valid_s2(),
        alpha_p in -180.0f64..180.0,
        delta_e in -150.0f64..50.0,
    ) {
        let mut engine = ScatteringEngine::new(small_instrument());
        engine.set_experiment(ExperimentConfiguration::new(ei, s2, alpha_p, PlotType::CosSquared)).unwrap();
        engine.set_crosshair(CrosshairUpdate::new().delta_e(delta_e)).unwrap();

        let first = engine.calculate_field();
        let second = engine.calculate_field();
        prop_assert_eq!(&first.energy, &second.energy);
        prop_assert_eq!(&first.q_hi, &second.q_hi);
        for (x, y) in first.intensity.iter().zip(second.intensity.iter()) {
            prop_assert!(x.to_bits() == y.to_bits());
        }
    }
}

// ── Engine State ─────────────────────────────────────────────────────

proptest! {
    /// Any accepted experiment comes back exactly.
    #[test]
    fn experiment_round_trip(
        ei in 0.01f64..=100.0,
        s2 in valid_s2(),
        alpha_p in -180.0f64..=180.0,
        plot_type in any_plot_type(),
        mod_q in 0.0f64..15.0,
    ) {
        let mut engine = ScatteringEngine::default();
        engine.set_crosshair(CrosshairUpdate::new().mod_q(mod_q)).unwrap();
        let lattice = engine.get_lattice();

        let exp = ExperimentConfiguration::new(ei, s2, alpha_p, plot_type);
        prop_assert!(engine.set_experiment(exp).is_ok());
        prop_assert_eq!(engine.get_experiment(), exp);
        prop_assert_eq!(engine.get_lattice(), lattice);
        prop_assert_eq!(engine.crosshair().mod_q, mod_q);
    }

    /// |Q| = 2π·|hkl|/a for a cubic cell.
    #[test]
    fn cubic_reciprocal_length(
        a in 0.5f64..20.0,
        h in -10i32..=10,
        k in -10i32..=10,
        l in -10i32..=10,
    ) {
        let (h, k, l) = (h as f64, k as f64, l as f64);
        let q = reciprocal_length(a, a, a, 90.0, 90.0, 90.0, h, k, l);
        let expected = 2.0 * std::f64::consts::PI * (h * h + k * k + l * l).sqrt() / a;
        prop_assert!((q - expected).abs() <= 1e-9 * expected.max(1.0));
    }

    /// The triangle cannot close with |Q| = 0 and a nonzero energy transfer.
    #[test]
    fn beam_angle_nan_at_zero_q(
        s2 in valid_s2(),
        delta_e in prop_oneof![-50.0f64..-0.01, 0.01f64..18.0],
    ) {
        let inst = InstrumentConfig::default();
        let exp = ExperimentConfiguration::new(20.0, s2, 0.0, PlotType::CosSquared);
        let point = CrosshairPoint { delta_e, mod_q: 0.0 };
        prop_assert!(beam_angle(&inst, &exp, point).is_nan());
    }
}

#[test]
fn reciprocal_length_reference_values() {
    let zero = LatticeParameters::new([1.0, 1.0, 1.0, 90.0, 90.0, 90.0], [0.0, 0.0, 0.0]);
    assert_eq!(zero.reciprocal_length(), 0.0);

    let q = LatticeParameters::new([1.0, 1.0, 1.0, 90.0, 90.0, 90.0], [1.0, 2.0, 3.0]);
    assert!((q.reciprocal_length() - 23.5095267).abs() < 1e-6);
}
