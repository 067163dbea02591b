// tests/stability_sweep_test.rs

use approx::assert_abs_diff_eq;

use motor_loop_render::constants::{ROOT_AGREEMENT_TOLERANCE, SWEEP_GRID_SAMPLES};
use motor_loop_render::controller_config::{BlendCoefficients, ControllerConstants};
use motor_loop_render::data_analysis::characteristic_roots::{
    closed_form_roots, coefficient_grid, companion_roots, sweep, RootMethod,
};
use motor_loop_render::data_analysis::stability_search::{find_most_stable, StabilityCriterion};

#[test]
fn closed_form_and_companion_agree_over_full_grid() {
    let constants = ControllerConstants::default();
    let pairs = coefficient_grid(SWEEP_GRID_SAMPLES);
    assert_eq!(pairs.len(), SWEEP_GRID_SAMPLES);

    for pair in &pairs {
        let (c1, c2) = closed_form_roots(&constants, pair);
        let (e1, e2) = companion_roots(&constants, pair);
        assert!(
            (c1 - e1).norm() < ROOT_AGREEMENT_TOLERANCE,
            "lambda1 mismatch at {pair}: {c1} vs {e1}"
        );
        assert!(
            (c2 - e2).norm() < ROOT_AGREEMENT_TOLERANCE,
            "lambda2 mismatch at {pair}: {c2} vs {e2}"
        );
    }
}

#[test]
fn sweeps_by_both_methods_pick_same_pair() {
    let constants = ControllerConstants::default();
    let pairs = coefficient_grid(SWEEP_GRID_SAMPLES);
    let closed = sweep(&constants, &pairs, RootMethod::ClosedForm);
    let companion = sweep(&constants, &pairs, RootMethod::CompanionMatrix);

    for criterion in [StabilityCriterion::FirstRoot, StabilityCriterion::SummedRoots] {
        let a = find_most_stable(&closed, criterion).unwrap();
        let b = find_most_stable(&companion, criterion).unwrap();
        assert_abs_diff_eq!(a.magnitude, b.magnitude, epsilon = 1e-7);
        // Neighbouring grid points may swap places only if their magnitudes tie
        assert!(a.index.abs_diff(b.index) <= 1);
    }
}

#[test]
fn search_matches_brute_force_minimum() {
    let constants = ControllerConstants::default();
    let pairs = coefficient_grid(SWEEP_GRID_SAMPLES);
    let result = sweep(&constants, &pairs, RootMethod::ClosedForm);

    for criterion in [StabilityCriterion::FirstRoot, StabilityCriterion::SummedRoots] {
        let best = find_most_stable(&result, criterion).unwrap();
        let brute = result
            .iter()
            .map(|(_, l1, l2)| criterion.magnitude(l1, l2))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(best.magnitude, brute);
        assert_eq!(best.coefficients, pairs[best.index]);
        assert!(best.is_stable());
    }
}

#[test]
fn default_pair_roots_lie_inside_unit_circle() {
    let constants = ControllerConstants::default();
    let (l1, l2) = closed_form_roots(&constants, &BlendCoefficients::default());
    assert!(l1.norm() < 1.0);
    assert!(l2.norm() < 1.0);
    assert_abs_diff_eq!(l1.re, -0.2163, epsilon = 1e-3);
    assert_abs_diff_eq!(l2.re, -0.5219, epsilon = 1e-3);
}

#[test]
fn export_writes_one_row_per_pair() {
    use motor_loop_render::data_output::sweep_export::export_sweep_csv;

    let constants = ControllerConstants::default();
    let pairs = coefficient_grid(21);
    let result = sweep(&constants, &pairs, RootMethod::CompanionMatrix);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sweep.csv");
    export_sweep_csv(&result, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), pairs.len() + 1);
    assert!(text.starts_with("a,b,lambda1_re"));
}
