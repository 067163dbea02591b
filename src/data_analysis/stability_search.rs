// src/data_analysis/stability_search.rs

use std::fmt;

use num_complex::Complex64;
use tracing::debug;

use crate::data_analysis::characteristic_roots::RootSweep;
use crate::controller_config::BlendCoefficients;

/// What "smallest natural frequency" means when ranking coefficient pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StabilityCriterion {
    /// |lambda1| only. For a conjugate pair both roots share this magnitude.
    #[default]
    FirstRoot,
    /// |lambda1| + |lambda2|
    SummedRoots,
}

impl StabilityCriterion {
    pub fn magnitude(&self, lambda1: Complex64, lambda2: Complex64) -> f64 {
        match self {
            StabilityCriterion::FirstRoot => lambda1.norm(),
            StabilityCriterion::SummedRoots => lambda1.norm() + lambda2.norm(),
        }
    }
}

/// The coefficient pair with the smallest criterion value across a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityOptimum {
    /// Position of the pair in the sweep
    pub index: usize,
    pub coefficients: BlendCoefficients,
    pub lambda1: Complex64,
    pub lambda2: Complex64,
    pub magnitude: f64,
    pub criterion: StabilityCriterion,
}

impl StabilityOptimum {
    /// Both roots strictly inside the unit circle.
    pub fn is_stable(&self) -> bool {
        self.lambda1.norm() < 1.0 && self.lambda2.norm() < 1.0
    }
}

impl fmt::Display for StabilityOptimum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Freq Mag: {}, (a, b): {}",
            self.magnitude, self.coefficients
        )
    }
}

/// Linear scan for the global minimum of `criterion` over the whole sweep.
///
/// Ties keep the earliest pair. NaN magnitudes never win.
pub fn find_most_stable(
    sweep: &RootSweep,
    criterion: StabilityCriterion,
) -> Option<StabilityOptimum> {
    let mut best: Option<StabilityOptimum> = None;
    for (index, (pair, lambda1, lambda2)) in sweep.iter().enumerate() {
        let magnitude = criterion.magnitude(lambda1, lambda2);
        let improves = match &best {
            Some(current) => magnitude < current.magnitude,
            None => !magnitude.is_nan(),
        };
        if improves {
            best = Some(StabilityOptimum {
                index,
                coefficients: *pair,
                lambda1,
                lambda2,
                magnitude,
                criterion,
            });
        }
    }
    if let Some(optimum) = &best {
        debug!(
            "Most stable pair at index {} of {}: {}",
            optimum.index,
            sweep.len(),
            optimum
        );
    }
    best
}
