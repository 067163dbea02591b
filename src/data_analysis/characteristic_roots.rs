// src/data_analysis/characteristic_roots.rs
//
// Natural frequencies of the closed speed loop.
//
// Rewriting the recurrence as
//     w[n+1] = p * w[n] - q * w[n-1] + g * w_d
// with g = dT * gamma * Kp, p = 1 + dT * beta - g * a and q = g * b
// gives the characteristic polynomial lambda^2 - p * lambda + q.
// Both roots inside the unit circle means the loop settles.

use nalgebra::Matrix2;
use ndarray::Array1;
use num_complex::Complex64;
use tracing::debug;

use crate::constants::COEFFICIENT_SUM_TOLERANCE;
use crate::controller_config::{BlendCoefficients, ControllerConstants};
use crate::types::RootPair;

/// How the roots are computed for each coefficient pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootMethod {
    /// Quadratic formula on the characteristic polynomial
    #[default]
    ClosedForm,
    /// Eigenvalues of the 2x2 companion matrix
    CompanionMatrix,
}

/// Polynomial coefficients (p, q) of `lambda^2 - p * lambda + q`.
pub fn characteristic_coefficients(
    constants: &ControllerConstants,
    coefficients: &BlendCoefficients,
) -> (f64, f64) {
    let gain = constants.loop_gain();
    let p = 1.0 + constants.delta_t() * constants.beta - gain * coefficients.a;
    let q = gain * coefficients.b;
    (p, q)
}

/// Roots via the quadratic formula, `(base + pm, base - pm)`.
///
/// The square root is taken on the complex plane so an oscillatory loop yields
/// a conjugate pair with the positive imaginary part first.
pub fn closed_form_roots(
    constants: &ControllerConstants,
    coefficients: &BlendCoefficients,
) -> RootPair {
    let (p, q) = characteristic_coefficients(constants, coefficients);
    let base = Complex64::new(p / 2.0, 0.0);
    let pm = Complex64::new(p * p - 4.0 * q, 0.0).sqrt() / 2.0;
    (base + pm, base - pm)
}

/// State-transition matrix of `[w[n+1], w[n]] = M * [w[n], w[n-1]]`.
pub fn companion_matrix(
    constants: &ControllerConstants,
    coefficients: &BlendCoefficients,
) -> Matrix2<f64> {
    let (p, q) = characteristic_coefficients(constants, coefficients);
    Matrix2::new(p, -q, 1.0, 0.0)
}

/// Roots as eigenvalues of the companion matrix.
///
/// Ordered like `closed_form_roots`: the root with the larger imaginary part
/// first for a conjugate pair, otherwise the larger real part first.
pub fn companion_roots(
    constants: &ControllerConstants,
    coefficients: &BlendCoefficients,
) -> RootPair {
    let eigenvalues = companion_matrix(constants, coefficients).complex_eigenvalues();
    order_roots(eigenvalues[0], eigenvalues[1])
}

fn order_roots(first: Complex64, second: Complex64) -> RootPair {
    let swap = if first.im != second.im {
        first.im < second.im
    } else {
        first.re < second.re
    };
    if swap {
        (second, first)
    } else {
        (first, second)
    }
}

/// Roots of one pair with the chosen method.
pub fn roots_for(
    constants: &ControllerConstants,
    coefficients: &BlendCoefficients,
    method: RootMethod,
) -> RootPair {
    match method {
        RootMethod::ClosedForm => closed_form_roots(constants, coefficients),
        RootMethod::CompanionMatrix => companion_roots(constants, coefficients),
    }
}

/// All (a, b) on a `samples` x `samples` grid over [0, 1]^2 with a + b = 1.
///
/// Pairs come out in a-major order.
pub fn coefficient_grid(samples: usize) -> Vec<BlendCoefficients> {
    let axis = Array1::<f64>::linspace(0.0, 1.0, samples);
    let mut pairs = Vec::with_capacity(samples);
    for &a in axis.iter() {
        for &b in axis.iter() {
            if ((a + b) - 1.0).abs() <= COEFFICIENT_SUM_TOLERANCE {
                pairs.push(BlendCoefficients { a, b });
            }
        }
    }
    debug!(
        "Coefficient grid: {} of {} candidates satisfy a + b = 1",
        pairs.len(),
        samples * samples
    );
    pairs
}

/// Roots of every swept pair, kept aligned with the pairs that produced them.
#[derive(Debug, Clone, Default)]
pub struct RootSweep {
    pub pairs: Vec<BlendCoefficients>,
    pub lambda1: Vec<Complex64>,
    pub lambda2: Vec<Complex64>,
}

impl RootSweep {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The two root branches, first then second.
    pub fn branches(&self) -> [&[Complex64]; 2] {
        [&self.lambda1, &self.lambda2]
    }

    /// Iterate `(pair, lambda1, lambda2)` in sweep order.
    pub fn iter(&self) -> impl Iterator<Item = (&BlendCoefficients, Complex64, Complex64)> + '_ {
        self.pairs
            .iter()
            .zip(self.lambda1.iter().copied())
            .zip(self.lambda2.iter().copied())
            .map(|((pair, l1), l2)| (pair, l1, l2))
    }
}

/// Compute both roots for each pair.
pub fn sweep(
    constants: &ControllerConstants,
    pairs: &[BlendCoefficients],
    method: RootMethod,
) -> RootSweep {
    let (lambda1, lambda2): (Vec<Complex64>, Vec<Complex64>) = pairs
        .iter()
        .map(|pair| roots_for(constants, pair, method))
        .unzip();
    debug!("Swept {} coefficient pairs with {:?}", pairs.len(), method);
    RootSweep {
        pairs: pairs.to_vec(),
        lambda1,
        lambda2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ROOT_AGREEMENT_TOLERANCE, SWEEP_GRID_SAMPLES};

    #[test]
    fn default_pair_is_stable() {
        let (l1, l2) = closed_form_roots(
            &ControllerConstants::default(),
            &BlendCoefficients::default(),
        );
        assert!(l1.norm() < 1.0);
        assert!(l2.norm() < 1.0);
    }

    #[test]
    fn roots_satisfy_vieta() {
        let constants = ControllerConstants::default();
        let pair = BlendCoefficients::from_a(0.4);
        let (p, q) = characteristic_coefficients(&constants, &pair);
        let (l1, l2) = closed_form_roots(&constants, &pair);
        assert!(((l1 + l2) - Complex64::new(p, 0.0)).norm() < 1e-12);
        assert!(((l1 * l2) - Complex64::new(q, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn complex_pair_has_positive_imaginary_first() {
        // a = 0 makes q large relative to p^2, so the roots are oscillatory.
        let (l1, l2) = closed_form_roots(
            &ControllerConstants::default(),
            &BlendCoefficients::from_a(0.0),
        );
        assert!(l1.im > 0.0);
        assert!((l1 - l2.conj()).norm() < 1e-12);
    }

    #[test]
    fn companion_matrix_layout() {
        let constants = ControllerConstants::default();
        let pair = BlendCoefficients::default();
        let (p, q) = characteristic_coefficients(&constants, &pair);
        let m = companion_matrix(&constants, &pair);
        assert_eq!(m[(0, 0)], p);
        assert_eq!(m[(0, 1)], -q);
        assert_eq!(m[(1, 0)], 1.0);
        assert_eq!(m[(1, 1)], 0.0);
    }

    #[test]
    fn grid_has_one_pair_per_sample() {
        let grid = coefficient_grid(SWEEP_GRID_SAMPLES);
        assert_eq!(grid.len(), SWEEP_GRID_SAMPLES);
        assert!(grid
            .iter()
            .all(|p| (p.a + p.b - 1.0).abs() <= COEFFICIENT_SUM_TOLERANCE));
        assert_eq!(grid[0].a, 0.0);
        assert!(grid.windows(2).all(|w| w[0].a < w[1].a));
    }

    #[test]
    fn methods_agree_on_small_grid() {
        let constants = ControllerConstants::default();
        for pair in coefficient_grid(51) {
            let (c1, c2) = closed_form_roots(&constants, &pair);
            let (e1, e2) = companion_roots(&constants, &pair);
            assert!((c1 - e1).norm() < ROOT_AGREEMENT_TOLERANCE, "{pair}");
            assert!((c2 - e2).norm() < ROOT_AGREEMENT_TOLERANCE, "{pair}");
        }
    }

    #[test]
    fn sweep_keeps_alignment() {
        let constants = ControllerConstants::default();
        let pairs = coefficient_grid(11);
        let result = sweep(&constants, &pairs, RootMethod::ClosedForm);
        assert_eq!(result.len(), pairs.len());
        assert_eq!(result.lambda1.len(), pairs.len());
        assert_eq!(result.lambda2.len(), pairs.len());
        for (pair, l1, l2) in result.iter() {
            assert_eq!((l1, l2), closed_form_roots(&constants, pair));
        }
    }

    #[test]
    fn empty_grid_gives_empty_sweep() {
        let result = sweep(&ControllerConstants::default(), &[], RootMethod::CompanionMatrix);
        assert!(result.is_empty());
    }
}
