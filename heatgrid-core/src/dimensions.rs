//! Label and cell pixel dimensions
//!
//! Label widths are estimated from character counts rather than measured
//! text, so they are pure functions of the label strings. Only the
//! responsive cell width consults the layout surface.

use crate::error::GridError;
use serde::Serialize;

/// Estimated pixel width of one label character
pub const CHARACTER_WIDTH: f64 = 9.0;

/// Column labels are rotated, so their box is never narrower than this
pub const MIN_COLUMN_LABEL_WIDTH: f64 = 50.0;

/// Something that can report the rendered width of the chart container
pub trait LayoutSurface {
    /// Current container width in pixels, or `None` if it cannot be measured
    fn container_width(&self) -> Option<f64>;
}

impl LayoutSurface for f64 {
    fn container_width(&self) -> Option<f64> {
        Some(*self)
    }
}

impl LayoutSurface for Option<f64> {
    fn container_width(&self) -> Option<f64> {
        *self
    }
}

/// How cell width is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidthMode {
    /// Every cell is exactly this many pixels wide
    Fixed(f64),
    /// Cells share the container width left over after the row gutter
    Responsive,
}

/// Pixel dimensions of a rendered heatmap
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimensions {
    pub row_label_width: f64,
    pub column_label_width: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Dimensions {
    /// Compute all dimensions for the given labels and width mode
    pub fn compute<S, L>(
        row_labels: &[L],
        column_labels: &[L],
        mode: WidthMode,
        cell_height: f64,
        surface: &S,
    ) -> Result<Self, GridError>
    where
        S: LayoutSurface + ?Sized,
        L: AsRef<str>,
    {
        let row_label_width = row_label_width(row_labels);
        let column_label_width = column_label_width(column_labels);
        let cell_width = match mode {
            WidthMode::Fixed(width) => width,
            WidthMode::Responsive => {
                let container = surface
                    .container_width()
                    .ok_or(GridError::MissingContainerWidth)?;
                responsive_cell_width(container, row_label_width, column_labels.len())?
            }
        };

        if cell_width <= 0.0 {
            tracing::warn!(cell_width, "computed cell width is not positive");
        }
        tracing::debug!(
            row_label_width,
            column_label_width,
            cell_width,
            "computed heatmap dimensions"
        );

        Ok(Dimensions {
            row_label_width,
            column_label_width,
            cell_width,
            cell_height,
        })
    }
}

fn longest_label<L: AsRef<str>>(labels: &[L]) -> Option<usize> {
    labels.iter().map(|l| l.as_ref().chars().count()).max()
}

/// Width of the row-label gutter: longest label times the character width
pub fn row_label_width<L: AsRef<str>>(labels: &[L]) -> f64 {
    match longest_label(labels) {
        Some(len) => len as f64 * CHARACTER_WIDTH,
        None => 0.0,
    }
}

/// Height reserved for rotated column labels, floored at 50px
pub fn column_label_width<L: AsRef<str>>(labels: &[L]) -> f64 {
    match longest_label(labels) {
        Some(len) => (len as f64 * CHARACTER_WIDTH).max(MIN_COLUMN_LABEL_WIDTH),
        None => 0.0,
    }
}

/// Cell width when cells share the container: `(container - gutter) / columns`
pub fn responsive_cell_width(
    container_width: f64,
    row_label_width: f64,
    column_count: usize,
) -> Result<f64, GridError> {
    if column_count == 0 {
        return Err(GridError::NoColumns);
    }
    Ok((container_width - row_label_width) / column_count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEKDAYS: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursay",
        "Friday",
        "Saturday",
        "Sunday",
    ];

    #[test]
    fn test_row_label_width_uses_longest_label() {
        assert_eq!(row_label_width(&["Lily", "Sebastian", "Max"]), 81.0);
    }

    #[test]
    fn test_empty_labels_have_zero_width() {
        let empty: [&str; 0] = [];
        assert_eq!(row_label_width(&empty), 0.0);
        assert_eq!(column_label_width(&empty), 0.0);
    }

    #[test]
    fn test_single_character_labels_still_scale() {
        assert_eq!(row_label_width(&["a", "b"]), 9.0);
    }

    #[test]
    fn test_column_label_width_floor() {
        assert_eq!(column_label_width(&["M", "T"]), 50.0);
        assert_eq!(column_label_width(&WEEKDAYS), 81.0);
    }

    #[test]
    fn test_row_label_width_is_monotonic() {
        let mut previous = 0.0;
        for len in 1..20 {
            let label = "x".repeat(len);
            let width = row_label_width(&[label.as_str(), "y"]);
            assert!(width > previous);
            previous = width;
        }
    }

    #[test]
    fn test_labels_count_characters_not_bytes() {
        assert_eq!(row_label_width(&["Zoë"]), 27.0);
    }

    #[test]
    fn test_fixed_mode_ignores_surface() {
        let dims = Dimensions::compute(
            &["Lily"],
            &["Mon"],
            WidthMode::Fixed(40.0),
            40.0,
            &None::<f64>,
        )
        .unwrap();
        assert_eq!(dims.cell_width, 40.0);
        assert_eq!(dims.row_label_width, 36.0);
    }

    #[test]
    fn test_responsive_mode_divides_remaining_width() {
        let rows = ["Lily", "Serena", "Sebastian", "Max", "Diana"];
        let dims =
            Dimensions::compute(&rows, &WEEKDAYS, WidthMode::Responsive, 40.0, &781.0).unwrap();
        assert_eq!(dims.cell_width, 100.0);
    }

    #[test]
    fn test_responsive_mode_requires_measurement() {
        let err = Dimensions::compute(
            &["a"],
            &["b"],
            WidthMode::Responsive,
            40.0,
            &None::<f64>,
        )
        .unwrap_err();
        assert_eq!(err, GridError::MissingContainerWidth);
    }

    #[test]
    fn test_responsive_mode_guards_zero_columns() {
        assert_eq!(
            responsive_cell_width(500.0, 10.0, 0),
            Err(GridError::NoColumns)
        );
    }
}
