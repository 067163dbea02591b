// src/constants.rs

// Import specific colors needed
use plotters::style::colors::full_palette::{BLUE, GREY_300, ORANGE, RED};
use plotters::style::RGBColor;

// --- Default Controller Constants ---
// Proportional gain applied to the speed error.
pub const DEFAULT_KP: f64 = 1.6;
// Plant decay coefficient (per second).
pub const DEFAULT_BETA: f64 = -0.677;
// Plant input gain.
pub const DEFAULT_GAMMA: f64 = 16.93;
// Controller updates per second (RPS). The sample interval is 1 / RPS.
pub const DEFAULT_SAMPLES_PER_SECOND: f64 = 15.0;
// Target angular velocity (rad/s).
pub const DEFAULT_TARGET_SPEED: f64 = 1.0;

// Default blending of current and previous speed samples in the error term (a + b = 1).
pub const DEFAULT_BLEND_A: f64 = 15.0 / 16.0;
pub const DEFAULT_BLEND_B: f64 = 1.0 / 16.0;

// Allowed deviation of a + b from 1 when validating or sweeping coefficient pairs.
pub const COEFFICIENT_SUM_TOLERANCE: f64 = 1e-12;

// --- Simulation ---
pub const DEFAULT_START_SPEED: f64 = 0.0;
pub const DEFAULT_SIMULATION_DURATION_S: f64 = 3.0;
// Each simulated sample is repeated this many times so the line plot shows steps.
pub const DEFAULT_OVERSAMPLE_FACTOR: usize = 3;

// --- Characteristic Root Sweep ---
// Samples of a and of b on [0, 1]; the candidate grid is the square of this.
pub const SWEEP_GRID_SAMPLES: usize = 1000;
// Closed-form and companion-matrix roots must agree within this distance.
pub const ROOT_AGREEMENT_TOLERANCE: f64 = 1e-8;
// Margin used when classifying a root as inside the unit circle.
pub const STABILITY_MARGIN: f64 = 1e-12;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 1080;
pub const ROOT_SCATTER_PLOT_HEIGHT: u32 = 640;

// --- Plot Color Assignments ---
pub const COLOR_SPEED_DEVIATION: &RGBColor = &ORANGE;
pub const COLOR_ROOT_STABLE: &RGBColor = &BLUE;
pub const COLOR_ROOT_UNSTABLE: &RGBColor = &RED;
pub const COLOR_UNIT_CIRCLE: &RGBColor = &GREY_300;
pub const UNIT_CIRCLE_OPACITY: f64 = 0.5;
// Number of line segments used to draw the unit circle.
pub const UNIT_CIRCLE_SEGMENTS: usize = 360;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 2;
pub const LINE_WIDTH_LEGEND: u32 = 2;
pub const SCATTER_POINT_SIZE: u32 = 3;

// Font sizes
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 14;
pub const FONT_SIZE_LEGEND: i32 = 14;
pub const FONT_SIZE_ANNOTATION: i32 = 14;
pub const FONT_SIZE_MESSAGE: i32 = 20;

// src/constants.rs
