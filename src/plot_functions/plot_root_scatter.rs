// src/plot_functions/plot_root_scatter.rs

use num_complex::Complex64;
use plotters::style::RGBColor;
use std::error::Error;
use std::path::Path;

use crate::constants::{
    COLOR_ROOT_STABLE, COLOR_ROOT_UNSTABLE, PLOT_WIDTH, ROOT_SCATTER_PLOT_HEIGHT,
    SCATTER_POINT_SIZE, STABILITY_MARGIN,
};
use crate::data_analysis::characteristic_roots::RootSweep;
use crate::data_analysis::stability_search::StabilityOptimum;
use crate::plot_framework::{
    calculate_range, draw_panel_row, Annotation, PlotConfig, PlotSeries, SeriesStyle,
};
use crate::types::ComplexPlanePoints;

const PANEL_NAMES: [&str; 2] = ["λ1", "λ2"];

/// Strictly inside the unit circle, with a small margin so roots on the
/// boundary count as unstable.
pub fn is_inside_unit_circle(lambda: Complex64, margin: f64) -> bool {
    lambda.norm() + margin < 1.0
}

/// Split one root branch into (stable, unstable) points.
pub fn partition_by_stability(roots: &[Complex64]) -> (ComplexPlanePoints, ComplexPlanePoints) {
    let mut stable = Vec::new();
    let mut unstable = Vec::new();
    for lambda in roots {
        if is_inside_unit_circle(*lambda, STABILITY_MARGIN) {
            stable.push((lambda.re, lambda.im));
        } else {
            unstable.push((lambda.re, lambda.im));
        }
    }
    (stable, unstable)
}

/// Chart for one root branch, zoomed to the data, optionally marking the best pair.
pub fn root_scatter_plot_config(
    sweep: &RootSweep,
    branch: usize,
    optimum: Option<&StabilityOptimum>,
) -> Option<PlotConfig> {
    let roots = *sweep.branches().get(branch)?;
    if roots.is_empty() {
        return None;
    }

    let finite: Vec<&Complex64> = roots.iter().filter(|l| l.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let re_min = finite.iter().map(|l| l.re).fold(f64::INFINITY, f64::min);
    let re_max = finite.iter().map(|l| l.re).fold(f64::NEG_INFINITY, f64::max);
    let im_min = finite.iter().map(|l| l.im).fold(f64::INFINITY, f64::min);
    let im_max = finite.iter().map(|l| l.im).fold(f64::NEG_INFINITY, f64::max);
    let (x_min, x_max) = calculate_range(re_min, re_max);
    let (y_min, y_max) = calculate_range(im_min, im_max);

    let (stable, unstable) = partition_by_stability(roots);
    let stable_color: RGBColor = *COLOR_ROOT_STABLE;
    let unstable_color: RGBColor = *COLOR_ROOT_UNSTABLE;
    let series = vec![
        PlotSeries {
            data: stable,
            label: "|λ| < 1".to_string(),
            color: stable_color,
            stroke_width: 0,
            style: SeriesStyle::Points(SCATTER_POINT_SIZE),
        },
        PlotSeries {
            data: unstable,
            label: "|λ| ≥ 1".to_string(),
            color: unstable_color,
            stroke_width: 0,
            style: SeriesStyle::Points(SCATTER_POINT_SIZE),
        },
    ];

    let annotations = optimum
        .map(|best| {
            let lambda = if branch == 0 { best.lambda1 } else { best.lambda2 };
            vec![Annotation {
                position: (lambda.re, lambda.im),
                text: format!("  (a, b) = {}", best.coefficients),
            }]
        })
        .unwrap_or_default();

    Some(PlotConfig {
        title: PANEL_NAMES[branch].to_string(),
        x_range: x_min..x_max,
        y_range: y_min..y_max,
        series,
        x_label: "Re(λ)".to_string(),
        y_label: "Im(λ)".to_string(),
        unit_circle: true,
        annotations,
    })
}

/// Generates the side-by-side stability scatter of both root branches
pub fn plot_root_scatter(
    sweep: &RootSweep,
    optimum: Option<&StabilityOptimum>,
    output_dir: &Path,
    root_name: &str,
) -> Result<(), Box<dyn Error>> {
    let output_file = output_dir.join(format!("{root_name}_RootStability.png"));
    let output_file = output_file.to_string_lossy();
    let configs: Vec<Option<PlotConfig>> = (0..PANEL_NAMES.len())
        .map(|branch| root_scatter_plot_config(sweep, branch, optimum))
        .collect();

    draw_panel_row(
        &output_file,
        root_name,
        "Root Stability",
        &PANEL_NAMES,
        (PLOT_WIDTH, ROOT_SCATTER_PLOT_HEIGHT),
        move |branch| configs.get(branch).cloned().flatten(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller_config::BlendCoefficients;
    use crate::data_analysis::stability_search::{find_most_stable, StabilityCriterion};

    fn small_sweep() -> RootSweep {
        RootSweep {
            pairs: vec![BlendCoefficients::from_a(0.25), BlendCoefficients::from_a(0.75)],
            lambda1: vec![Complex64::new(0.5, 0.5), Complex64::new(1.0, 0.0)],
            lambda2: vec![Complex64::new(0.5, -0.5), Complex64::new(-0.2, 0.0)],
        }
    }

    #[test]
    fn unit_boundary_counts_as_unstable() {
        assert!(!is_inside_unit_circle(Complex64::new(1.0, 0.0), STABILITY_MARGIN));
        assert!(!is_inside_unit_circle(Complex64::new(0.0, -1.0), 0.0));
        assert!(is_inside_unit_circle(Complex64::new(0.6, 0.6), STABILITY_MARGIN));
    }

    #[test]
    fn partition_splits_branch() {
        let (stable, unstable) = partition_by_stability(&small_sweep().lambda1);
        assert_eq!(stable, vec![(0.5, 0.5)]);
        assert_eq!(unstable, vec![(1.0, 0.0)]);
    }

    #[test]
    fn annotation_marks_best_pair() {
        let sweep = small_sweep();
        let best = find_most_stable(&sweep, StabilityCriterion::FirstRoot).unwrap();
        let config = root_scatter_plot_config(&sweep, 1, Some(&best)).unwrap();
        assert_eq!(config.title, "λ2");
        assert_eq!(config.annotations.len(), 1);
        assert_eq!(config.annotations[0].position, (0.5, -0.5));
        assert!(config.annotations[0].text.contains("(0.25, 0.75)"));
    }

    #[test]
    fn out_of_range_branch_is_none() {
        assert!(root_scatter_plot_config(&small_sweep(), 2, None).is_none());
    }
}
