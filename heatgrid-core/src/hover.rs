//! Hover state machine and tooltip lookup
//!
//! Pointer-enter is authoritative: entering a cell replaces whatever was
//! hovered before, even without an intervening leave. Adjacent cells can
//! deliver the new enter before the old leave.

use crate::error::{Axis, GridError};
use crate::matrix::{format_value, Cell, Matrix};
use serde::Serialize;
use std::fmt;

/// Which cell, if any, the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HoverState {
    #[default]
    Idle,
    Hovering { row: usize, col: usize },
}

impl HoverState {
    /// Pointer entered cell (row, col)
    pub fn enter(self, row: usize, col: usize) -> HoverState {
        tracing::trace!(previous = ?self, row, col, "pointer enter");
        HoverState::Hovering { row, col }
    }

    /// Pointer left the hovered cell
    pub fn leave(self) -> HoverState {
        tracing::trace!(previous = ?self, "pointer leave");
        HoverState::Idle
    }

    pub fn cell(&self) -> Option<(usize, usize)> {
        match *self {
            HoverState::Idle => None,
            HoverState::Hovering { row, col } => Some((row, col)),
        }
    }

    pub fn is_hovering(&self, row: usize, col: usize) -> bool {
        self.cell() == Some((row, col))
    }
}

/// Tooltip contents for one cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub row_label: String,
    pub column_label: String,
    pub value: Cell,
}

impl Tooltip {
    /// Resolve the labels and value of a cell, failing on any out-of-range index
    pub fn lookup<L: AsRef<str>>(
        matrix: &Matrix,
        row_labels: &[L],
        column_labels: &[L],
        row: usize,
        col: usize,
    ) -> Result<Tooltip, GridError> {
        let value = matrix.cell(row, col)?;
        Ok(Tooltip {
            row_label: label_at(row_labels, Axis::Row, row)?.to_string(),
            column_label: label_at(column_labels, Axis::Column, col)?.to_string(),
            value,
        })
    }

    /// Value as shown in the overlay
    pub fn value_text(&self) -> String {
        format_value(self.value)
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}: {}",
            self.row_label,
            self.column_label,
            self.value_text()
        )
    }
}

fn label_at<L: AsRef<str>>(labels: &[L], axis: Axis, index: usize) -> Result<&str, GridError> {
    labels
        .get(index)
        .map(|l| l.as_ref())
        .ok_or(GridError::LabelOutOfRange {
            axis,
            index,
            len: labels.len(),
        })
}
