//! JSON and text output for a laid-out heatmap
//!
//! Global invariants enforced:
//! - Cells are emitted in row-major order
//! - Byte-for-byte identical output across runs

use crate::dimensions::Dimensions;
use crate::error::GridError;
use crate::heatmap::Heatmap;
use crate::hover::{HoverState, Tooltip};
use crate::matrix::Cell;
use crate::view::ViewState;
use serde::Serialize;

/// Complete description of a rendered heatmap
#[derive(Debug, Clone, Serialize)]
pub struct GridReport {
    pub rows: usize,
    pub columns: usize,
    pub dimensions: Dimensions,
    pub fixed_width: bool,
    pub bucket_range: Option<f64>,
    pub legend: Vec<String>,
    pub hover: HoverState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    pub cells: Vec<CellReport>,
}

/// One colored cell
#[derive(Debug, Clone, Serialize)]
pub struct CellReport {
    pub row: usize,
    pub column: usize,
    pub row_label: String,
    pub column_label: String,
    pub value: Cell,
    /// Scale position, `None` when painted with the no-data color
    pub bucket: Option<usize>,
    pub color: String,
}

impl GridReport {
    /// Build a report from a heatmap and its current view
    pub fn new(heatmap: &Heatmap, view: &ViewState) -> Result<Self, GridError> {
        let buckets = heatmap.buckets();
        let matrix = heatmap.matrix();

        let mut cells = Vec::with_capacity(matrix.row_count() * matrix.column_count());
        for (row, values) in matrix.rows().iter().enumerate() {
            for col in 0..values.len() {
                let tooltip = heatmap.tooltip(row, col)?;
                cells.push(CellReport {
                    row,
                    column: col,
                    row_label: tooltip.row_label,
                    column_label: tooltip.column_label,
                    value: tooltip.value,
                    bucket: buckets.index(tooltip.value),
                    color: buckets.color(tooltip.value).to_string(),
                });
            }
        }

        let range = buckets.range();
        Ok(GridReport {
            rows: matrix.row_count(),
            columns: matrix.column_count(),
            dimensions: view.dimensions,
            fixed_width: heatmap.is_fixed_width(),
            bucket_range: range.is_finite().then_some(range),
            legend: heatmap
                .scale()
                .legend()
                .into_iter()
                .map(str::to_string)
                .collect(),
            hover: view.hover,
            tooltip: view.tooltip(heatmap)?,
            cells,
        })
    }
}

/// Render a report as pretty-printed JSON
pub fn render_json(report: &GridReport) -> Result<String, GridError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render a plain-text grid of bucket indices (`.` for no data)
pub fn render_text(report: &GridReport) -> String {
    let gutter = report
        .cells
        .iter()
        .map(|c| c.row_label.chars().count())
        .max()
        .unwrap_or(0);
    let width = report
        .cells
        .iter()
        .map(|c| c.column_label.chars().count())
        .max()
        .unwrap_or(1)
        .max(1);

    let mut out = String::new();

    if report.columns > 0 {
        out.push_str(&format!("{:gutter$}", ""));
        for cell in report.cells.iter().take(report.columns) {
            out.push_str(&format!(" {:>width$}", cell.column_label));
        }
        out.push('\n');
    }

    for row in report.cells.chunks(report.columns.max(1)) {
        let label = row.first().map(|c| c.row_label.as_str()).unwrap_or("");
        out.push_str(&format!("{:<gutter$}", label));
        for cell in row {
            let mark = cell
                .bucket
                .map(|b| b.to_string())
                .unwrap_or_else(|| ".".to_string());
            out.push_str(&format!(" {:>width$}", mark));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "\nLegend: . = no data ({}), 0..{} = {}\n",
        report.legend.first().map(String::as_str).unwrap_or(""),
        report.legend.len().saturating_sub(2),
        report.legend.iter().skip(1).cloned().collect::<Vec<_>>().join(", ")
    ));

    if let Some(tooltip) = &report.tooltip {
        out.push_str(&format!("Hover: {}\n", tooltip));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::HeatmapOptions;

    fn report(hover: Option<(usize, usize)>) -> GridReport {
        let heatmap = Heatmap::new(HeatmapOptions {
            data: vec![vec![Some(0.0), Some(50.0)], vec![Some(20.0), None]],
            row_labels: vec!["Ann".to_string(), "Bo".to_string()],
            column_labels: vec!["Mon".to_string(), "Tue".to_string()],
            ..HeatmapOptions::default()
        })
        .unwrap();
        let mut view = ViewState::compute(&heatmap, &None::<f64>).unwrap();
        if let Some((row, col)) = hover {
            view.enter(&heatmap, row, col).unwrap();
        }
        GridReport::new(&heatmap, &view).unwrap()
    }

    #[test]
    fn test_report_cells_in_row_major_order() {
        let report = report(None);
        let coords: Vec<(usize, usize)> = report.cells.iter().map(|c| (c.row, c.column)).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(report.bucket_range, Some(10.0));
        assert_eq!(report.cells[0].bucket, None);
        assert_eq!(report.cells[1].bucket, Some(4));
        assert_eq!(report.cells[2].bucket, Some(2));
        assert_eq!(report.cells[3].bucket, None);
    }

    #[test]
    fn test_json_is_deterministic() {
        let a = render_json(&report(Some((1, 0)))).unwrap();
        let b = render_json(&report(Some((1, 0)))).unwrap();
        assert_eq!(a, b);
        assert!(a.contains(r#""state": "hovering""#));
        assert!(a.contains(r#""row_label": "Bo""#));
    }

    #[test]
    fn test_text_grid() {
        let text = render_text(&report(Some((0, 1))));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    Mon Tue");
        assert_eq!(lines[1], "Ann   .   4");
        assert_eq!(lines[2], "Bo    2   .");
        assert!(text.contains("Hover: Ann, Tue: 50"));
    }
}
