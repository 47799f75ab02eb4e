//! The heatmap component: validated matrix, labels, and display options
//!
//! A `Heatmap` can only be built through [`Heatmap::new`], which checks
//! every shape constraint up front. Rendering code may then index labels
//! by matrix position, and still goes through bounds-checked lookups.

use crate::bucket::{ColorBuckets, ColorScale, BLUES, GRAY};
use crate::dimensions::{Dimensions, LayoutSurface, WidthMode};
use crate::error::{Axis, GridError};
use crate::hover::Tooltip;
use crate::matrix::{Cell, Matrix};
use serde::{Deserialize, Serialize};

/// Default cell height and fixed cell width in pixels
pub const DEFAULT_CELL_SIZE: f64 = 40.0;

/// Column labels narrower than this switch to every-third labeling
pub const DENSE_CELL_WIDTH: f64 = 20.0;

/// Where rotated column labels are drawn relative to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnLabelPosition {
    Top,
    #[default]
    Bottom,
}

impl ColumnLabelPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnLabelPosition::Top => "top",
            ColumnLabelPosition::Bottom => "bottom",
        }
    }
}

/// Unvalidated construction input
#[derive(Debug, Clone)]
pub struct HeatmapOptions {
    pub data: Vec<Vec<Cell>>,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cell_height: f64,
    pub cell_width: f64,
    pub fixed_width: bool,
    pub colors: Vec<String>,
    pub no_data_color: String,
    pub show_legend: bool,
    pub show_tooltip: bool,
    pub show_interval_column: bool,
    pub column_label_position: ColumnLabelPosition,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        HeatmapOptions {
            data: vec![vec![]],
            row_labels: Vec::new(),
            column_labels: Vec::new(),
            cell_height: DEFAULT_CELL_SIZE,
            cell_width: DEFAULT_CELL_SIZE,
            fixed_width: true,
            colors: BLUES.iter().map(|c| c.to_string()).collect(),
            no_data_color: GRAY.to_string(),
            show_legend: true,
            show_tooltip: true,
            show_interval_column: false,
            column_label_position: ColumnLabelPosition::Bottom,
        }
    }
}

/// A validated heatmap ready for layout and rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    matrix: Matrix,
    row_labels: Vec<String>,
    column_labels: Vec<String>,
    cell_height: f64,
    width_mode: WidthMode,
    scale: ColorScale,
    pub show_legend: bool,
    pub show_tooltip: bool,
    pub show_interval_column: bool,
    pub column_label_position: ColumnLabelPosition,
}

impl Heatmap {
    /// Validate options, failing on the first shape or size mismatch
    pub fn new(options: HeatmapOptions) -> Result<Self, GridError> {
        let matrix = Matrix::new(options.data)?;
        let scale = ColorScale::new(options.colors, options.no_data_color)?;

        check_cell_size("cell_height", options.cell_height)?;
        if options.fixed_width {
            check_cell_size("cell_width", options.cell_width)?;
        }

        // Only an unlabeled matrix without cells (the `[[]]` default) skips the row check
        if matrix.column_count() > 0 || !options.row_labels.is_empty() {
            check_label_count(Axis::Row, options.row_labels.len(), matrix.row_count())?;
        }
        check_label_count(
            Axis::Column,
            options.column_labels.len(),
            matrix.column_count(),
        )?;

        let width_mode = if options.fixed_width {
            WidthMode::Fixed(options.cell_width)
        } else {
            if matrix.column_count() == 0 {
                return Err(GridError::NoColumns);
            }
            WidthMode::Responsive
        };

        Ok(Heatmap {
            matrix,
            row_labels: options.row_labels,
            column_labels: options.column_labels,
            cell_height: options.cell_height,
            width_mode,
            scale,
            show_legend: options.show_legend,
            show_tooltip: options.show_tooltip,
            show_interval_column: options.show_interval_column,
            column_label_position: options.column_label_position,
        })
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    pub fn width_mode(&self) -> WidthMode {
        self.width_mode
    }

    pub fn is_fixed_width(&self) -> bool {
        matches!(self.width_mode, WidthMode::Fixed(_))
    }

    /// Switch between fixed and responsive cell width, revalidating columns
    pub fn with_width_mode(mut self, mode: WidthMode) -> Result<Self, GridError> {
        match mode {
            WidthMode::Fixed(width) => check_cell_size("cell_width", width)?,
            WidthMode::Responsive if self.matrix.column_count() == 0 => {
                return Err(GridError::NoColumns)
            }
            WidthMode::Responsive => {}
        }
        self.width_mode = mode;
        Ok(self)
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    /// Bucket thresholds for this heatmap's values
    pub fn buckets(&self) -> ColorBuckets<'_> {
        ColorBuckets::new(&self.matrix, &self.scale)
    }

    /// Label and cell dimensions against the given surface
    pub fn dimensions<S: LayoutSurface + ?Sized>(
        &self,
        surface: &S,
    ) -> Result<Dimensions, GridError> {
        Dimensions::compute(
            self.row_labels.as_slice(),
            self.column_labels.as_slice(),
            self.width_mode,
            self.cell_height,
            surface,
        )
    }

    /// Tooltip for a cell, with bounds-checked label and value lookups
    pub fn tooltip(&self, row: usize, col: usize) -> Result<Tooltip, GridError> {
        Tooltip::lookup(
            &self.matrix,
            self.row_labels.as_slice(),
            self.column_labels.as_slice(),
            row,
            col,
        )
    }

    /// Whether the column label at `index` is drawn at this cell width
    ///
    /// Narrow cells or interval mode label only every third column.
    pub fn column_label_visible(&self, index: usize, cell_width: f64) -> bool {
        (!self.show_interval_column && cell_width > DENSE_CELL_WIDTH) || index % 3 == 0
    }

    /// Minimum width of a column label box; fixed cells add the 2px borders
    pub fn column_label_min_width(&self, cell_width: f64) -> f64 {
        if self.is_fixed_width() {
            cell_width + 4.0
        } else {
            cell_width
        }
    }
}

fn check_cell_size(field: &'static str, value: f64) -> Result<(), GridError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidCellSize { field, value })
    }
}

fn check_label_count(axis: Axis, labels: usize, cells: usize) -> Result<(), GridError> {
    if labels == cells {
        Ok(())
    } else {
        Err(GridError::LabelCountMismatch {
            axis,
            labels,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(rows: usize, cols: usize) -> HeatmapOptions {
        HeatmapOptions {
            data: vec![vec![Some(1.0); cols]; rows],
            row_labels: (0..rows).map(|i| format!("r{}", i)).collect(),
            column_labels: (0..cols).map(|i| format!("c{}", i)).collect(),
            ..HeatmapOptions::default()
        }
    }

    #[test]
    fn test_default_options_are_valid() {
        let heatmap = Heatmap::new(HeatmapOptions::default()).unwrap();
        assert_eq!(heatmap.matrix().row_count(), 1);
        assert_eq!(heatmap.matrix().column_count(), 0);
        assert!(heatmap.is_fixed_width());
        assert!(heatmap.show_legend);
        assert!(heatmap.show_tooltip);
        assert_eq!(heatmap.column_label_position, ColumnLabelPosition::Bottom);
    }

    #[test]
    fn test_row_label_mismatch() {
        let mut opts = options(5, 3);
        opts.row_labels.pop();
        let err = Heatmap::new(opts).unwrap_err();
        assert_eq!(
            err.to_string(),
            "row label count 4 does not match matrix row count 5"
        );
    }

    #[test]
    fn test_column_label_mismatch() {
        let mut opts = options(2, 3);
        opts.column_labels.push("extra".to_string());
        assert_eq!(
            Heatmap::new(opts).unwrap_err(),
            GridError::LabelCountMismatch {
                axis: Axis::Column,
                labels: 4,
                cells: 3
            }
        );
    }

    #[test]
    fn test_row_labels_checked_without_columns() {
        let opts = HeatmapOptions {
            data: vec![vec![], vec![], vec![]],
            row_labels: vec!["a".to_string()],
            ..HeatmapOptions::default()
        };
        assert_eq!(
            Heatmap::new(opts).unwrap_err(),
            GridError::LabelCountMismatch {
                axis: Axis::Row,
                labels: 1,
                cells: 3
            }
        );

        let opts = HeatmapOptions {
            data: vec![],
            row_labels: vec!["x".to_string(), "y".to_string()],
            ..HeatmapOptions::default()
        };
        assert_eq!(
            Heatmap::new(opts).unwrap_err().to_string(),
            "row label count 2 does not match matrix row count 0"
        );
    }

    #[test]
    fn test_unlabeled_rows_without_columns_accepted() {
        let opts = HeatmapOptions {
            data: vec![vec![], vec![], vec![]],
            ..HeatmapOptions::default()
        };
        let heatmap = Heatmap::new(opts).unwrap();
        assert_eq!(heatmap.matrix().row_count(), 3);
        assert!(heatmap.row_labels().is_empty());
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        let mut opts = options(2, 3);
        opts.data[1].pop();
        assert!(matches!(
            Heatmap::new(opts),
            Err(GridError::RaggedMatrix { row: 1, .. })
        ));
    }

    #[test]
    fn test_empty_scale_rejected() {
        let mut opts = options(2, 2);
        opts.colors.clear();
        assert_eq!(Heatmap::new(opts), Err(GridError::EmptyColorScale));
    }

    #[test]
    fn test_invalid_cell_size_rejected() {
        let mut opts = options(1, 1);
        opts.cell_height = 0.0;
        assert!(matches!(
            Heatmap::new(opts),
            Err(GridError::InvalidCellSize {
                field: "cell_height",
                ..
            })
        ));
    }

    #[test]
    fn test_responsive_without_columns_rejected() {
        let opts = HeatmapOptions {
            fixed_width: false,
            ..HeatmapOptions::default()
        };
        assert_eq!(Heatmap::new(opts), Err(GridError::NoColumns));
    }

    #[test]
    fn test_column_label_interval_rule() {
        let mut opts = options(1, 7);
        let heatmap = Heatmap::new(opts.clone()).unwrap();
        assert!((0..7).all(|i| heatmap.column_label_visible(i, 40.0)));
        let visible: Vec<usize> = (0..7)
            .filter(|&i| heatmap.column_label_visible(i, 15.0))
            .collect();
        assert_eq!(visible, vec![0, 3, 6]);

        opts.show_interval_column = true;
        let heatmap = Heatmap::new(opts).unwrap();
        assert!(!heatmap.column_label_visible(1, 40.0));
        assert!(heatmap.column_label_visible(3, 40.0));
    }

    #[test]
    fn test_column_label_min_width() {
        let heatmap = Heatmap::new(options(1, 2)).unwrap();
        assert_eq!(heatmap.column_label_min_width(40.0), 44.0);
        let heatmap = heatmap.with_width_mode(WidthMode::Responsive).unwrap();
        assert_eq!(heatmap.column_label_min_width(40.0), 40.0);
    }

    #[test]
    fn test_tooltip_through_component() {
        let heatmap = Heatmap::new(options(2, 2)).unwrap();
        assert_eq!(heatmap.tooltip(1, 0).unwrap().to_string(), "r1, c0: 1");
        assert!(heatmap.tooltip(2, 0).is_err());
    }
}
