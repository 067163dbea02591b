// src/plot_framework.rs

use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, PathElement, Polygon, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::f64::consts::TAU;
use std::ops::Range;

use crate::constants::{
    COLOR_UNIT_CIRCLE, FONT_SIZE_ANNOTATION, FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE,
    FONT_SIZE_LEGEND, FONT_SIZE_MAIN_TITLE, FONT_SIZE_MESSAGE, LINE_WIDTH_LEGEND,
    UNIT_CIRCLE_OPACITY, UNIT_CIRCLE_SEGMENTS,
};

// Pixels reserved around each chart for labels.
const X_LABEL_AREA_PX: u32 = 50;
const Y_LABEL_AREA_PX: u32 = 60;
const CHART_MARGIN_PX: u32 = 5;
const TITLE_MARGIN_PX: u32 = 50;

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Grow one of the two ranges so one data unit spans the same number of pixels
/// on both axes. Both ranges keep their centers.
pub fn equal_aspect_ranges(
    x_range: Range<f64>,
    y_range: Range<f64>,
    width_px: u32,
    height_px: u32,
) -> (Range<f64>, Range<f64>) {
    let x_span = x_range.end - x_range.start;
    let y_span = y_range.end - y_range.start;
    if width_px == 0 || height_px == 0 || x_span <= 0.0 || y_span <= 0.0 {
        return (x_range, y_range);
    }
    let x_per_px = x_span / width_px as f64;
    let y_per_px = y_span / height_px as f64;
    if x_per_px > y_per_px {
        let new_span = x_per_px * height_px as f64;
        let center = (y_range.start + y_range.end) / 2.0;
        (x_range, center - new_span / 2.0..center + new_span / 2.0)
    } else {
        let new_span = y_per_px * width_px as f64;
        let center = (x_range.start + x_range.end) / 2.0;
        (center - new_span / 2.0..center + new_span / 2.0, y_range)
    }
}

/// Tick label text for a value on an axis described by `axis_label`.
///
/// Large values use k/M notation, small fractional values and anything on a
/// complex-plane axis keep one or two decimals.
pub fn format_axis_value(value: f64, axis_label: &str) -> String {
    if axis_label.contains("λ") {
        format!("{:.2}", value)
    } else if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1000.0 {
        format!("{:.0}k", value / 1000.0)
    } else if value.abs() < 10.0 && (value.fract() != 0.0 || axis_label.contains("Amplitude")) {
        format!("{:.1}", value)
    } else {
        format!("{:.0}", value)
    }
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, Shift>,
    panel_name: &str,
    plot_type: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    // Constants for text rendering
    const CHAR_WIDTH_RATIO: f32 = 0.6; // Approximate character width relative to font size
    const LINE_HEIGHT_SPACING: i32 = 4; // Additional spacing between lines

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (
        (x_range.end - x_range.start) as u32,
        (y_range.end - y_range.start) as u32,
    );
    let message = format!("{panel_name} {plot_type} Data Unavailable:\n{reason}");

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = FONT_SIZE_MESSAGE + LINE_HEIGHT_SPACING;

    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    let estimated_text_width = max_line_length.saturating_mul(estimated_char_width as usize) as i32;
    let estimated_text_height = lines.len().saturating_mul(estimated_line_height as usize) as i32;

    let center_x = width as i32 / 2 - estimated_text_width / 2;
    let center_y = height as i32 / 2 - estimated_text_height / 2;

    let text_style = ("sans-serif", FONT_SIZE_MESSAGE).into_font().color(&RED);
    area.draw(&Text::new(message, (center_x, center_y), text_style))?;
    Ok(())
}

/// How a series is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    /// Filled dots of the given radius in pixels
    Points(u32),
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
    pub style: SeriesStyle,
}

/// Text placed at a data coordinate.
#[derive(Clone)]
pub struct Annotation {
    pub position: (f64, f64),
    pub text: String,
}

#[derive(Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
    /// Shade the unit disc behind the data (complex-plane plots)
    pub unit_circle: bool,
    pub annotations: Vec<Annotation>,
}

/// Points approximating the unit circle, closed.
pub fn unit_circle_points(segments: usize) -> Vec<(f64, f64)> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let theta = TAU * i as f64 / segments as f64;
            (theta.cos(), theta.sin())
        })
        .collect()
}

/// Draws a single chart from a PlotConfig.
fn draw_single_chart_with_config(
    area: &DrawingArea<BitMapBackend, Shift>,
    plot_config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(CHART_MARGIN_PX)
        .x_label_area_size(X_LABEL_AREA_PX)
        .y_label_area_size(Y_LABEL_AREA_PX)
        .build_cartesian_2d(plot_config.x_range.clone(), plot_config.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_labels(20)
        .y_labels(10)
        .x_label_formatter(&|x| format_axis_value(*x, &plot_config.x_label))
        .y_label_formatter(&|y| format_axis_value(*y, &plot_config.y_label))
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    // Unit disc goes under the data
    if plot_config.unit_circle {
        chart.draw_series(std::iter::once(Polygon::new(
            unit_circle_points(UNIT_CIRCLE_SEGMENTS),
            COLOR_UNIT_CIRCLE.mix(UNIT_CIRCLE_OPACITY).filled(),
        )))?;
    }

    let mut legend_series_count = 0;

    for s in &plot_config.series {
        if s.data.is_empty() {
            continue;
        }
        let color = s.color;
        match s.style {
            SeriesStyle::Line => {
                let series = chart.draw_series(LineSeries::new(
                    s.data.iter().cloned(),
                    color.stroke_width(s.stroke_width),
                ))?;
                if !s.label.is_empty() {
                    series.label(&s.label).legend(move |(x, y)| {
                        PathElement::new(
                            vec![(x, y), (x + 20, y)],
                            color.stroke_width(LINE_WIDTH_LEGEND),
                        )
                    });
                    legend_series_count += 1;
                }
            }
            SeriesStyle::Points(radius) => {
                let series = chart.draw_series(
                    s.data
                        .iter()
                        .map(|&point| Circle::new(point, radius, color.filled())),
                )?;
                if !s.label.is_empty() {
                    series
                        .label(&s.label)
                        .legend(move |(x, y)| Circle::new((x + 10, y), radius, color.filled()));
                    legend_series_count += 1;
                }
            }
        }
    }

    for annotation in &plot_config.annotations {
        chart.draw_series(std::iter::once(Text::new(
            annotation.text.clone(),
            annotation.position,
            ("sans-serif", FONT_SIZE_ANNOTATION).into_font().color(&BLACK),
        )))?;
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", FONT_SIZE_LEGEND))
            .draw()?;
    }

    Ok(())
}

/// Pixel size of the plotting region of one panel once title and label areas are removed.
pub fn panel_plot_area_px(width: u32, height: u32, panel_count: usize) -> (u32, u32) {
    let panels = panel_count.max(1) as u32;
    let panel_width = width / panels;
    let panel_height = height.saturating_sub(TITLE_MARGIN_PX + CHART_MARGIN_PX);
    (
        panel_width.saturating_sub(Y_LABEL_AREA_PX + 2 * CHART_MARGIN_PX),
        // Caption takes roughly twice the chart title font height
        panel_height
            .saturating_sub(X_LABEL_AREA_PX + 2 * CHART_MARGIN_PX)
            .saturating_sub(2 * FONT_SIZE_CHART_TITLE as u32),
    )
}

/// Draws `panel_names.len()` charts side by side into one PNG.
///
/// `get_panel_plot_data` is called once per panel index; `None` or empty data
/// leaves an explanatory message in that panel instead.
pub fn draw_panel_row<F>(
    output_filename: &str,
    root_name: &str,
    plot_type_name: &str,
    panel_names: &[&str],
    size: (u32, u32),
    mut get_panel_plot_data: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnMut(usize) -> Option<PlotConfig>,
{
    let root_area = BitMapBackend::new(output_filename, size).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        root_name,
        (10, 10),
        ("sans-serif", FONT_SIZE_MAIN_TITLE)
            .into_font()
            .color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(TITLE_MARGIN_PX, CHART_MARGIN_PX, CHART_MARGIN_PX, CHART_MARGIN_PX);
    let sub_plot_areas = margined_root_area.split_evenly((1, panel_names.len().max(1)));
    let mut any_panel_plotted = false;

    for (panel_index, (area, panel_name)) in sub_plot_areas.iter().zip(panel_names).enumerate() {
        match get_panel_plot_data(panel_index) {
            Some(plot_config) => {
                let has_data = plot_config.series.iter().any(|s| !s.data.is_empty());
                let valid_ranges = plot_config.x_range.end > plot_config.x_range.start
                    && plot_config.y_range.end > plot_config.y_range.start;
                if has_data && valid_ranges {
                    draw_single_chart_with_config(area, &plot_config)?;
                    any_panel_plotted = true;
                } else {
                    let reason = if !has_data {
                        "No data points"
                    } else {
                        "Invalid ranges"
                    };
                    draw_unavailable_message(area, panel_name, plot_type_name, reason)?;
                }
            }
            None => {
                let reason = "Calculation/Data Extraction Failed";
                draw_unavailable_message(area, panel_name, plot_type_name, reason)?;
            }
        }
    }

    root_area.present()?;
    if any_panel_plotted {
        println!("  Plot saved as '{output_filename}'.");
    } else {
        println!("  Skipping '{output_filename}' plot saving: No data available for any panel to plot, only placeholder messages shown.");
    }
    Ok(())
}
