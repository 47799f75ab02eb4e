//! Value-to-color bucketing
//!
//! Values are split into equal-width buckets of `ceil(max / colors)`,
//! one bucket per scale color. The matrix minimum is painted with the
//! no-data color, exactly like a missing value.
//!
//! Global invariants enforced:
//! - Bucket assignment depends only on (value, matrix, scale)
//! - Every returned color is the no-data color or a scale color

use crate::error::GridError;
use crate::matrix::{numeric, value_range, Cell, Matrix};
use serde::Serialize;

/// Light gray used for cells without data
pub const GRAY: &str = "#EFF3F7";

/// Default five-step blue scale, lightest first
pub const BLUES: [&str; 5] = [
    "rgba(140, 204, 250, 0.50)",
    "#8CCCFA",
    "#1991EB",
    "#007AD4",
    "#005DA2",
];

/// Ordered color tokens plus the distinguished no-data token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorScale {
    colors: Vec<String>,
    no_data: String,
}

impl ColorScale {
    pub fn new(colors: Vec<String>, no_data: impl Into<String>) -> Result<Self, GridError> {
        if colors.is_empty() {
            return Err(GridError::EmptyColorScale);
        }
        Ok(ColorScale {
            colors,
            no_data: no_data.into(),
        })
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn no_data(&self) -> &str {
        &self.no_data
    }

    /// Number of buckets, always at least one
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Legend swatches from "Less" to "More": no-data first, then the scale
    pub fn legend(&self) -> Vec<&str> {
        std::iter::once(self.no_data.as_str())
            .chain(self.colors.iter().map(String::as_str))
            .collect()
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        ColorScale {
            colors: BLUES.iter().map(|c| c.to_string()).collect(),
            no_data: GRAY.to_string(),
        }
    }
}

/// Color for `value` given every value in the matrix
///
/// Rescans `all_values` on each call; use [`ColorBuckets`] when coloring a
/// whole grid.
pub fn bucket_color<'a>(value: Cell, all_values: &[f64], scale: &'a ColorScale) -> &'a str {
    match value_range(all_values) {
        Some((min, max)) => ColorBuckets::from_range(min, max, scale).color(value),
        None => scale.no_data(),
    }
}

/// Bucket thresholds precomputed for one matrix and scale
#[derive(Debug, Clone)]
pub struct ColorBuckets<'a> {
    scale: &'a ColorScale,
    min: f64,
    range: f64,
}

impl<'a> ColorBuckets<'a> {
    pub fn new(matrix: &Matrix, scale: &'a ColorScale) -> Self {
        match matrix.range() {
            Some((min, max)) => ColorBuckets::from_range(min, max, scale),
            // No numbers at all: every cell is no-data
            None => ColorBuckets {
                scale,
                min: f64::NAN,
                range: f64::NAN,
            },
        }
    }

    fn from_range(min: f64, max: f64, scale: &'a ColorScale) -> Self {
        let range = (max / scale.len() as f64).ceil();
        tracing::debug!(min, max, range, buckets = scale.len(), "color bucket range");
        ColorBuckets { scale, min, range }
    }

    /// Width of each bucket, `ceil(max / bucket_count)`
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Bucket position for a value, `None` for the no-data color
    pub fn index(&self, value: Cell) -> Option<usize> {
        let value = numeric(value)?;
        if value == self.min || self.min.is_nan() {
            return None;
        }
        let last = self.scale.len() - 1;
        let index = (0..self.scale.len())
            .find(|&i| value < (i as f64 + 1.0) * self.range)
            .unwrap_or(last);
        Some(index)
    }

    pub fn color(&self, value: Cell) -> &'a str {
        match self.index(value) {
            Some(i) => self.scale.colors()[i].as_str(),
            None => self.scale.no_data(),
        }
    }
}
