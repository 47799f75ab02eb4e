//! Rectangular value matrix
//!
//! Invariants:
//! - Every row has the same number of cells
//! - Missing cells (`None`, NaN, infinities) never take part in min/max

use crate::error::GridError;
use serde::Serialize;

/// A single cell: a number, or `None` when there is no data
pub type Cell = Option<f64>;

/// Immutable, validated matrix of cell values
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Matrix {
    rows: Vec<Vec<Cell>>,
}

impl Matrix {
    /// Build a matrix, rejecting ragged rows
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        if let Some(first) = rows.first() {
            let expected = first.len();
            for (row, cells) in rows.iter().enumerate().skip(1) {
                if cells.len() != expected {
                    return Err(GridError::RaggedMatrix {
                        row,
                        expected,
                        found: cells.len(),
                    });
                }
            }
        }
        Ok(Matrix { rows })
    }

    /// Build a matrix from plain numbers
    pub fn from_values(rows: Vec<Vec<f64>>) -> Result<Self, GridError> {
        Matrix::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        )
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Look up a cell, returning `None` when the coordinate is off the grid
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Bounds-checked lookup that reports the grid size on failure
    pub fn cell(&self, row: usize, col: usize) -> Result<Cell, GridError> {
        self.get(row, col).ok_or(GridError::CellOutOfRange {
            row,
            col,
            rows: self.row_count(),
            cols: self.column_count(),
        })
    }

    /// All numeric values in row-major order
    pub fn flatten(&self) -> Vec<f64> {
        self.rows
            .iter()
            .flatten()
            .filter_map(|cell| numeric(*cell))
            .collect()
    }

    /// Minimum and maximum numeric value, or `None` if the matrix holds no numbers
    pub fn range(&self) -> Option<(f64, f64)> {
        value_range(&self.flatten())
    }
}

/// Treat non-finite numbers the same as missing cells
pub fn numeric(cell: Cell) -> Option<f64> {
    cell.filter(|v| v.is_finite())
}

/// Display form of a cell: integers without a fraction, missing as "no data"
pub fn format_value(cell: Cell) -> String {
    match numeric(cell) {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{:.0}", v),
        Some(v) => v.to_string(),
        None => "no data".to_string(),
    }
}

/// Minimum and maximum of a slice of numbers
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied().filter(|v| v.is_finite());
    let first = iter.next()?;
    Some(iter.fold((first, first), |(min, max), v| (min.min(v), max.max(v))))
}
