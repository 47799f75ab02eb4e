//! Validation and lookup errors for heatmap grids

use thiserror::Error;

/// Errors raised while validating a heatmap or resolving a cell against it
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// A matrix row has a different width than the first row
    #[error("matrix row {row} has {found} values, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A label sequence does not line up with the matrix
    #[error("{axis} label count {labels} does not match matrix {axis} count {cells}")]
    LabelCountMismatch {
        axis: Axis,
        labels: usize,
        cells: usize,
    },

    #[error("color scale must contain at least one color")]
    EmptyColorScale,

    /// Cell height or width is not a positive, finite pixel size
    #[error("{field} must be a positive number of pixels (got {value})")]
    InvalidCellSize { field: &'static str, value: f64 },

    /// Responsive width needs at least one column to divide by
    #[error("responsive cell width requires at least one column")]
    NoColumns,

    /// Responsive width was requested without any way to measure the container
    #[error("container width is required when fixed_width is false")]
    MissingContainerWidth,

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("no {axis} label at index {index} ({len} labels)")]
    LabelOutOfRange { axis: Axis, index: usize, len: usize },

    /// Chart data could not be encoded as JSON
    #[error("failed to serialize chart data: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::Serialization(err.to_string())
    }
}

/// Grid axis, used to name the offending dimension in errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mismatch_message_names_both_counts() {
        let err = GridError::LabelCountMismatch {
            axis: Axis::Row,
            labels: 4,
            cells: 5,
        };
        assert_eq!(
            err.to_string(),
            "row label count 4 does not match matrix row count 5"
        );
    }

    #[test]
    fn test_json_errors_convert_with_message() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let expected = json_err.to_string();
        let err = GridError::from(json_err);
        assert_eq!(err, GridError::Serialization(expected.clone()));
        assert_eq!(
            err.to_string(),
            format!("failed to serialize chart data: {}", expected)
        );
    }

    #[test]
    fn test_out_of_range_message() {
        let err = GridError::CellOutOfRange {
            row: 7,
            col: 1,
            rows: 5,
            cols: 7,
        };
        assert_eq!(err.to_string(), "cell (7, 1) is outside the 5x7 grid");
    }
}
