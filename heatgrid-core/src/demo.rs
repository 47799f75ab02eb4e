//! Built-in sample chart: minutes of activity per person per weekday

use crate::error::GridError;
use crate::heatmap::{Heatmap, HeatmapOptions};

pub const SAMPLE_ROW_LABELS: [&str; 5] = ["Lily", "Serena", "Sebastian", "Max", "Diana"];

pub const SAMPLE_COLUMN_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursay",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const SAMPLE_DATA: [[f64; 7]; 5] = [
    [30.0, 30.0, 30.0, 0.0, 120.0, 200.0, 60.0],
    [0.0, 0.0, 70.0, 20.0, 30.0, 60.0, 120.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0],
    [60.0, 60.0, 60.0, 60.0, 60.0, 30.0, 60.0],
    [30.0, 30.0, 0.0, 0.0, 0.0, 60.0, 0.0],
];

/// Options for the sample chart with every other setting at its default
pub fn sample_options(fixed_width: bool) -> HeatmapOptions {
    HeatmapOptions {
        data: SAMPLE_DATA
            .iter()
            .map(|row| row.iter().copied().map(Some).collect())
            .collect(),
        row_labels: SAMPLE_ROW_LABELS.iter().map(|s| s.to_string()).collect(),
        column_labels: SAMPLE_COLUMN_LABELS.iter().map(|s| s.to_string()).collect(),
        fixed_width,
        ..HeatmapOptions::default()
    }
}

pub fn sample_heatmap(fixed_width: bool) -> Result<Heatmap, GridError> {
    Heatmap::new(sample_options(fixed_width))
}
