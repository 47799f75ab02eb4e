//! heatgrid core library - heatmap layout, color bucketing, and rendering

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Bucket colors depend only on (value, matrix, color scale)
// - Dimensions depend only on (labels, options, container width)
// - View state changes only through explicit transitions
// - No global mutable state, no randomness, clocks, threads, or async
// - Identical input yields byte-for-byte identical output

pub mod bucket;
pub mod config;
pub mod demo;
pub mod dimensions;
pub mod error;
pub mod heatmap;
pub mod hover;
pub mod html;
pub mod matrix;
pub mod report;
pub mod view;

pub use bucket::{bucket_color, ColorBuckets, ColorScale};
pub use config::{HeatgridConfig, ResolvedConfig};
pub use dimensions::{Dimensions, LayoutSurface, WidthMode};
pub use error::GridError;
pub use heatmap::{ColumnLabelPosition, Heatmap, HeatmapOptions};
pub use hover::{HoverState, Tooltip};
pub use matrix::{Cell, Matrix};
pub use report::{render_json, render_text, GridReport};
pub use view::{MountedHeatmap, ViewEvent, ViewState, Viewport};

/// Output format for [`render`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Json,
    Text,
}

/// Lay out a resolved config and render it in the requested format
///
/// `hover` marks a cell as hovered in the rendered output.
pub fn render(
    resolved: &ResolvedConfig,
    format: OutputFormat,
    hover: Option<(usize, usize)>,
) -> anyhow::Result<String> {
    let heatmap = &resolved.heatmap;
    let mut view = ViewState::compute(heatmap, &resolved.container_width)?;
    if let Some((row, col)) = hover {
        view.apply(
            heatmap,
            &resolved.container_width,
            ViewEvent::PointerEnter { row, col },
        )?;
    }

    let output = match format {
        OutputFormat::Html => html::render_html(heatmap, &view, resolved.title.as_deref())?,
        OutputFormat::Json => render_json(&GridReport::new(heatmap, &view)?)?,
        OutputFormat::Text => render_text(&GridReport::new(heatmap, &view)?),
    };
    Ok(output)
}
