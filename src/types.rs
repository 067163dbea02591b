// src/types.rs
// Type aliases shared by the analysis and plotting modules

use num_complex::Complex64;

// The two characteristic roots of one coefficient pair, (base + pm, base - pm).
pub type RootPair = (Complex64, Complex64);

// (time_s, value) samples ready for a line plot.
pub type TimeSeries = Vec<(f64, f64)>;

// (Re, Im) points on the complex plane.
pub type ComplexPlanePoints = Vec<(f64, f64)>;

