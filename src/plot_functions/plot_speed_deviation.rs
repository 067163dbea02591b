// src/plot_functions/plot_speed_deviation.rs

use ndarray::Array1;
use ndarray_stats::QuantileExt;
use plotters::style::RGBColor;
use std::error::Error;
use std::path::Path;

use crate::constants::{COLOR_SPEED_DEVIATION, LINE_WIDTH_PLOT, PLOT_HEIGHT, PLOT_WIDTH};
use crate::controller_config::{BlendCoefficients, ControllerConstants};
use crate::plot_framework::{calculate_range, draw_panel_row, PlotConfig, PlotSeries, SeriesStyle};
use crate::types::TimeSeries;

/// Builds the chart for a deviation series, or `None` if there is nothing finite to draw.
pub fn speed_deviation_plot_config(
    series: &TimeSeries,
    constants: &ControllerConstants,
    coefficients: &BlendCoefficients,
) -> Option<PlotConfig> {
    if series.is_empty() {
        return None;
    }
    let times = Array1::from_iter(series.iter().map(|&(t, _)| t));
    let values = Array1::from_iter(series.iter().map(|&(_, v)| v));

    // min/max fail on NaN, which a diverging loop eventually produces
    let time_min = *times.min().ok()?;
    let time_max = *times.max().ok()?;
    let val_min = *values.min().ok()?;
    let val_max = *values.max().ok()?;
    if !val_min.is_finite() || !val_max.is_finite() {
        return None;
    }
    let (y_min, y_max) = calculate_range(val_min, val_max);

    let color: RGBColor = *COLOR_SPEED_DEVIATION;
    Some(PlotConfig {
        title: "Angular Velocity Deviation of the Motor Over Time".to_string(),
        x_range: time_min..time_max,
        y_range: y_min..y_max,
        series: vec![PlotSeries {
            data: series.clone(),
            label: format!("{constants}, (a, b) = {coefficients}"),
            color,
            stroke_width: LINE_WIDTH_PLOT,
            style: SeriesStyle::Line,
        }],
        x_label: "Time (s)".to_string(),
        y_label: "Amplitude (rad/s)".to_string(),
        unit_circle: false,
        annotations: Vec::new(),
    })
}

/// Generates the speed deviation (w - w_d) plot
pub fn plot_speed_deviation(
    series: &TimeSeries,
    constants: &ControllerConstants,
    coefficients: &BlendCoefficients,
    output_dir: &Path,
    root_name: &str,
) -> Result<(), Box<dyn Error>> {
    let output_file = output_dir.join(format!("{root_name}_SpeedDeviation.png"));
    let output_file = output_file.to_string_lossy();
    let plot_config = speed_deviation_plot_config(series, constants, coefficients);

    draw_panel_row(
        &output_file,
        root_name,
        "Speed Deviation",
        &["Motor"],
        (PLOT_WIDTH, PLOT_HEIGHT),
        move |_| plot_config.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_analysis::recurrence::deviation_series;

    #[test]
    fn config_covers_series() {
        let constants = ControllerConstants::default();
        let coefficients = BlendCoefficients::default();
        let series = deviation_series(&constants, &coefficients, 0.0, 3.0, 3);
        let config = speed_deviation_plot_config(&series, &constants, &coefficients).unwrap();
        assert_eq!(config.x_range.start, 0.0);
        assert!(config.y_range.start < -1.0);
        assert!(config.y_range.end > 0.0);
        assert_eq!(config.series[0].data.len(), series.len());
    }

    #[test]
    fn empty_series_has_no_config() {
        assert!(speed_deviation_plot_config(
            &Vec::new(),
            &ControllerConstants::default(),
            &BlendCoefficients::default()
        )
        .is_none());
    }
}
