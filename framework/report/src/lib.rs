mod chart;

pub use chart::{render, ChartPanel, ChartRequest, EmptySeries};
pub use plotters::style::{RGBColor, BLUE, GREEN, RED};
