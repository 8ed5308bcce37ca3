use std::ops::Range;
use std::path::Path;

use anyhow::{anyhow, Context};
use load_gauge_core::prelude::{Metric, ScenarioSeries, TimeSeries};
use plotters::coord::Shift;
use plotters::prelude::*;

const PANEL_WIDTH: u32 = 600;
const PANEL_HEIGHT: u32 = 600;
const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// A scenario's series and how they should be charted.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    series: ScenarioSeries,
    file_name: String,
    cumulative: bool,
    cpu_colour: RGBColor,
}

/// One subplot of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel<'a> {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub colour: RGBColor,
    pub series: &'a TimeSeries,
}

/// The chart could not be drawn because a metric has no samples.
#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
#[display("No {metric} samples to chart for the {scenario} scenario")]
pub struct EmptySeries {
    pub scenario: String,
    pub metric: Metric,
}

impl ChartRequest {
    pub fn new(series: ScenarioSeries, file_name: impl Into<String>) -> Self {
        Self {
            series,
            file_name: file_name.into(),
            cumulative: false,
            cpu_colour: GREEN,
        }
    }

    /// Label the y axes as totals, for series that are all measured from one baseline.
    pub fn cumulative(mut self) -> Self {
        self.cumulative = true;
        self
    }

    pub fn with_cpu_colour(mut self, colour: RGBColor) -> Self {
        self.cpu_colour = colour;
        self
    }

    pub fn series(&self) -> &ScenarioSeries {
        &self.series
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// One panel per metric, in the order they are laid out from left to right.
    pub fn panels(&self) -> Vec<ChartPanel<'_>> {
        let action = self.series.action();
        let total = if self.cumulative { "Total " } else { "" };

        Metric::ALL
            .iter()
            .map(|&metric| {
                let (name, y_label, colour) = match metric {
                    Metric::Memory => ("Memory Usage", "Memory Usage (MB)", BLUE),
                    Metric::CpuTime => ("CPU Usage", "Time Spent in CPU (Seconds)", self.cpu_colour),
                    Metric::Elapsed => ("Time Elapsed", "Time Elapsed (Seconds)", ORANGE),
                };

                ChartPanel {
                    title: format!("{name} over Todos {action}"),
                    x_label: format!("Number of Todos {action}"),
                    y_label: format!("{total}{y_label}"),
                    colour,
                    series: self.series.series(metric),
                }
            })
            .collect()
    }
}

/// Draw every panel of the request side by side and save the image to `path`.
///
/// The image format follows the file extension. Fails with [EmptySeries] if any metric has no
/// samples, in which case nothing is written.
pub fn render(request: &ChartRequest, path: &Path) -> anyhow::Result<()> {
    let panels = request.panels();
    if let Some(empty) = panels.iter().find(|panel| panel.series.is_empty()) {
        return Err(EmptySeries {
            scenario: request.series.name().to_string(),
            metric: empty.series.metric(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create chart directory '{}'", parent.display())
        })?;
    }

    let root = BitMapBackend::new(path, (PANEL_WIDTH * panels.len() as u32, PANEL_HEIGHT))
        .into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    for (area, panel) in root.split_evenly((1, panels.len())).iter().zip(&panels) {
        draw_panel(area, panel)?;
    }

    root.present().map_err(draw_error)?;
    log::info!("Wrote chart '{}'", path.display());

    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &ChartPanel<'_>,
) -> anyhow::Result<()> {
    let (x_range, y_range) = axis_ranges(panel.series)
        .ok_or_else(|| anyhow!("No samples for panel '{}'", panel.title))?;
    let points = panel
        .series
        .samples()
        .iter()
        .map(|sample| (sample.count as f64, sample.value))
        .collect::<Vec<_>>();

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .draw()
        .map_err(draw_error)?;

    chart
        .draw_series(LineSeries::new(
            points.iter().copied(),
            panel.colour.stroke_width(2),
        ))
        .map_err(draw_error)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 4, panel.colour.filled())),
        )
        .map_err(draw_error)?;

    Ok(())
}

fn draw_error<E: std::fmt::Debug>(err: E) -> anyhow::Error {
    anyhow!("Failed to draw chart: {err:?}")
}

fn axis_ranges(series: &TimeSeries) -> Option<(Range<f64>, Range<f64>)> {
    let first = series.samples().first()?.count as f64;
    let last = series.samples().last()?.count as f64;
    let (lo, hi) = series.value_bounds()?;

    Some((padded(first, last), padded(lo, hi)))
}

/// Widen a range by 5% on both sides. A single value gets a range around it so the axis is never
/// empty.
fn padded(lo: f64, hi: f64) -> Range<f64> {
    let span = hi - lo;
    let pad = if span > 0.0 {
        span / 20.0
    } else if hi != 0.0 {
        hi.abs() / 20.0
    } else {
        1.0
    };

    (lo - pad)..(hi + pad)
}
