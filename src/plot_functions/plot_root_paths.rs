// src/plot_functions/plot_root_paths.rs

use plotters::style::RGBColor;
use std::error::Error;
use std::path::Path;

use crate::constants::{LINE_WIDTH_PLOT, PLOT_HEIGHT, PLOT_WIDTH};
use crate::data_analysis::characteristic_roots::RootSweep;
use crate::plot_framework::{
    calculate_range, draw_panel_row, equal_aspect_ranges, panel_plot_area_px, PlotConfig,
    PlotSeries, SeriesStyle,
};
use crate::types::ComplexPlanePoints;

/// Distinct color for the n-th root branch.
fn branch_color(branch: usize) -> RGBColor {
    let c = colorous::CATEGORY10[branch % colorous::CATEGORY10.len()];
    RGBColor(c.r, c.g, c.b)
}

/// Complex-plane extent that always includes the unit circle.
pub fn complex_plane_bounds(branches: &[ComplexPlanePoints]) -> (f64, f64, f64, f64) {
    let (mut re_min, mut re_max, mut im_min, mut im_max) = (-1.0_f64, 1.0_f64, -1.0_f64, 1.0_f64);
    for &(re, im) in branches.iter().flatten() {
        if re.is_finite() && im.is_finite() {
            re_min = re_min.min(re);
            re_max = re_max.max(re);
            im_min = im_min.min(im);
            im_max = im_max.max(im);
        }
    }
    (re_min, re_max, im_min, im_max)
}

/// Root branches as continuous paths on the complex plane over the unit disc.
pub fn root_paths_plot_config(sweep: &RootSweep, size: (u32, u32)) -> Option<PlotConfig> {
    if sweep.is_empty() {
        return None;
    }
    let branches: Vec<ComplexPlanePoints> = sweep
        .branches()
        .iter()
        .map(|roots| roots.iter().map(|l| (l.re, l.im)).collect())
        .collect();

    let (re_min, re_max, im_min, im_max) = complex_plane_bounds(&branches);
    let (x_min, x_max) = calculate_range(re_min, re_max);
    let (y_min, y_max) = calculate_range(im_min, im_max);
    let (plot_w, plot_h) = panel_plot_area_px(size.0, size.1, 1);
    let (x_range, y_range) = equal_aspect_ranges(x_min..x_max, y_min..y_max, plot_w, plot_h);

    let series = branches
        .into_iter()
        .enumerate()
        .map(|(i, data)| PlotSeries {
            data,
            label: format!("λ{}", i + 1),
            color: branch_color(i),
            stroke_width: LINE_WIDTH_PLOT,
            style: SeriesStyle::Line,
        })
        .collect();

    Some(PlotConfig {
        title: "Natural Frequencies over (a, b) with a + b = 1".to_string(),
        x_range,
        y_range,
        series,
        x_label: "Re(λ)".to_string(),
        y_label: "Im(λ)".to_string(),
        unit_circle: true,
        annotations: Vec::new(),
    })
}

/// Generates the root path plot for a sweep
pub fn plot_root_paths(
    sweep: &RootSweep,
    output_dir: &Path,
    root_name: &str,
) -> Result<(), Box<dyn Error>> {
    let output_file = output_dir.join(format!("{root_name}_RootPaths.png"));
    let output_file = output_file.to_string_lossy();
    let size = (PLOT_WIDTH, PLOT_HEIGHT);
    let plot_config = root_paths_plot_config(sweep, size);

    draw_panel_row(
        &output_file,
        root_name,
        "Root Path",
        &["λ"],
        size,
        move |_| plot_config.clone(),
    )
}
