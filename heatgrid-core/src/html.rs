//! HTML heatmap rendering
//!
//! Generates a self-contained HTML document with embedded CSS and JavaScript.
//! The static markup reflects one `ViewState` (dimensions and hovered cell);
//! the inline script keeps hover and responsive width live in the browser
//! using the same rules. Works offline.

use crate::dimensions::Dimensions;
use crate::error::{Axis, GridError};
use crate::heatmap::{ColumnLabelPosition, Heatmap};
use crate::matrix::{format_value, numeric};
use crate::view::ViewState;
use serde::Serialize;

/// Legend swatch edge length in pixels
const LEGEND_SWATCH: u32 = 20;

/// Chart settings handed to the inline script
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptConfig<'a> {
    row_labels: &'a [String],
    column_labels: &'a [String],
    row_label_width: f64,
    columns: usize,
    fixed_width: bool,
    show_tooltip: bool,
    show_interval_column: bool,
}

/// Render a full HTML page containing the heatmap
pub fn render_html(
    heatmap: &Heatmap,
    view: &ViewState,
    title: Option<&str>,
) -> Result<String, GridError> {
    let title = title.unwrap_or("Heatmap");
    let chart = render_heatmap(heatmap, view)?;
    let config = script_config(heatmap, &view.dimensions)?;

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        {chart}
        {footer}
    </div>
    <script>window.__hgChart = {config};</script>
    <script>{js}</script>
</body>
</html>"#,
        title = html_escape(title),
        css = inline_css(),
        chart = chart,
        footer = render_footer(),
        config = config,
        js = inline_javascript(),
    ))
}

/// Render just the heatmap block (legend, rows, column labels)
pub fn render_heatmap(heatmap: &Heatmap, view: &ViewState) -> Result<String, GridError> {
    let dims = &view.dimensions;
    let legend = if heatmap.show_legend {
        render_legend(heatmap)
    } else {
        String::new()
    };
    let rows = render_rows(heatmap, view)?;
    let column_labels = render_column_labels(heatmap, dims);
    let (top, bottom) = match heatmap.column_label_position {
        ColumnLabelPosition::Top => (column_labels, String::new()),
        ColumnLabelPosition::Bottom => (String::new(), column_labels),
    };

    Ok(format!(
        r#"<div class="heatmap" id="heatmap" data-label-position="{position}">
    {legend}
    <div class="heatmap-data">{top}{rows}{bottom}
    </div>
</div>"#,
        position = heatmap.column_label_position.as_str(),
        legend = legend,
        top = top,
        rows = rows,
        bottom = bottom,
    ))
}

/// Render the "Less ... More" legend strip
fn render_legend(heatmap: &Heatmap) -> String {
    let panels: String = heatmap
        .scale()
        .legend()
        .into_iter()
        .map(|color| {
            format!(
                r#"<div class="legend-swatch" style="background-color: {color}; width: {size}px; height: {size}px;"></div>"#,
                color = html_escape(color),
                size = LEGEND_SWATCH,
            )
        })
        .collect();

    format!(
        r#"<div class="legend-panel">
        <div class="legend-label">Less</div>{panels}<div class="legend-label">More</div>
    </div>"#,
        panels = panels,
    )
}

/// Render every row: label gutter followed by colored tiles
fn render_rows(heatmap: &Heatmap, view: &ViewState) -> Result<String, GridError> {
    let dims = &view.dimensions;
    let buckets = heatmap.buckets();
    let tooltip = view.tooltip(heatmap)?;
    let gutter = gutter_style(dims.row_label_width);
    let mut out = String::new();

    for (row_index, row) in heatmap.matrix().rows().iter().enumerate() {
        // Unlabeled rows only exist in a matrix without cells
        let labels = heatmap.row_labels();
        let label = if labels.is_empty() {
            ""
        } else {
            labels
                .get(row_index)
                .map(String::as_str)
                .ok_or(GridError::LabelOutOfRange {
                    axis: Axis::Row,
                    index: row_index,
                    len: labels.len(),
                })?
        };

        let mut tiles = String::new();
        for (col_index, cell) in row.iter().enumerate() {
            let mut style = format!(
                "background-color: {}; width: {}px; height: {}px; border: 2px solid white;",
                html_escape(buckets.color(*cell)),
                px(dims.cell_width),
                px(dims.cell_height),
            );
            if heatmap.is_fixed_width() {
                style.push_str(&format!(" min-width: {}px;", px(dims.cell_width)));
            }

            let hover_info = match &tooltip {
                Some(t) if view.hover.is_hovering(row_index, col_index) => format!(
                    r#"<div class="hover-info">{}, {}: <strong>{}</strong></div>"#,
                    html_escape(&t.row_label),
                    html_escape(&t.column_label),
                    html_escape(&t.value_text()),
                ),
                _ => String::new(),
            };

            let bucket = buckets
                .index(*cell)
                .map(|i| i.to_string())
                .unwrap_or_else(|| "none".to_string());
            let value_attr = numeric(*cell).map(|_| format_value(*cell)).unwrap_or_default();

            tiles.push_str(&format!(
                r#"
            <div class="tile" data-row="{row}" data-col="{col}" data-value="{value}" data-bucket="{bucket}" style="{style}">{hover}</div>"#,
                row = row_index,
                col = col_index,
                value = html_escape(&value_attr),
                bucket = bucket,
                style = style,
                hover = hover_info,
            ));
        }

        out.push_str(&format!(
            r#"
        <div class="flex-row">
            <div class="row-label" style="{gutter}">{label}</div>{tiles}
        </div>"#,
            gutter = gutter,
            label = html_escape(label),
            tiles = tiles,
        ));
    }

    Ok(out)
}

/// Render the rotated column labels row
fn render_column_labels(heatmap: &Heatmap, dims: &Dimensions) -> String {
    let min_width = heatmap.column_label_min_width(dims.cell_width);
    let labels: String = heatmap
        .column_labels()
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let text = if heatmap.column_label_visible(index, dims.cell_width) {
                html_escape(label)
            } else {
                String::new()
            };
            format!(
                r#"
            <div class="column-label-container" style="min-width: {min_width}px; height: {height}px;">
                <div class="column-label-rotated-text" style="height: {cell}px; line-height: {cell}px; top: -{half}px; width: {height}px;">{text}</div>
            </div>"#,
                min_width = px(min_width),
                height = px(dims.column_label_width),
                cell = px(dims.cell_width),
                half = px((dims.cell_width / 2.0).floor()),
                text = text,
            )
        })
        .collect();

    format!(
        r#"
        <div class="flex-row column-labels">
            <div style="{gutter}"></div>{labels}
        </div>"#,
        gutter = gutter_style(dims.row_label_width),
        labels = labels,
    )
}

fn gutter_style(width: f64) -> String {
    format!("min-width: {w}px; max-width: {w}px;", w = px(width))
}

/// JSON settings for the inline script, safe to embed in a `<script>` tag
fn script_config(heatmap: &Heatmap, dims: &Dimensions) -> Result<String, GridError> {
    let config = ScriptConfig {
        row_labels: heatmap.row_labels(),
        column_labels: heatmap.column_labels(),
        row_label_width: dims.row_label_width,
        columns: heatmap.matrix().column_count(),
        fixed_width: heatmap.is_fixed_width(),
        show_tooltip: heatmap.show_tooltip,
        show_interval_column: heatmap.show_interval_column,
    };
    Ok(serde_json::to_string(&config)?.replace("</", "<\\/"))
}

/// Pixel value without a trailing `.0`, at most two decimals otherwise
fn px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Render footer
fn render_footer() -> String {
    r#"<footer>
    <p>Generated by heatgrid</p>
</footer>"#
        .to_string()
}

/// Inline CSS styles
fn inline_css() -> &'static str {
    r#"
* {
    box-sizing: border-box;
    margin: 0;
    padding: 0;
}

body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.6;
    color: #111827;
    background: #ffffff;
}

.container {
    max-width: 1400px;
    margin: 0 auto;
    padding: 2rem;
}

h1 {
    font-size: 1.25rem;
    font-weight: 600;
    margin-bottom: 1rem;
}

.heatmap {
    width: 100%;
    font-size: 0.875rem;
}

.flex-row {
    display: flex;
    flex-direction: row;
    align-items: center;
}

.row-label {
    overflow: hidden;
    white-space: nowrap;
    color: #374151;
}

.tile {
    position: relative;
    cursor: default;
}

.hover-info {
    position: absolute;
    bottom: calc(100% + 6px);
    left: 50%;
    transform: translateX(-50%);
    z-index: 10;
    padding: 0.25rem 0.5rem;
    white-space: nowrap;
    background: #111827;
    color: #ffffff;
    border-radius: 0.25rem;
    pointer-events: none;
}

.column-label-container {
    position: relative;
    overflow: visible;
}

.column-label-rotated-text {
    position: absolute;
    left: 0;
    transform: rotate(-90deg) translateX(-100%);
    transform-origin: top left;
    white-space: nowrap;
    color: #6b7280;
}

.heatmap[data-label-position="top"] .column-label-rotated-text {
    transform: rotate(-90deg);
    transform-origin: bottom left;
}

.legend-panel {
    display: flex;
    align-items: center;
    gap: 2px;
    margin-bottom: 1rem;
}

.legend-label {
    color: #6b7280;
    padding: 0 0.5rem;
}

footer {
    margin-top: 2rem;
    color: #9ca3af;
    font-size: 0.75rem;
}
"#
}

/// Inline JavaScript for hover tooltips and responsive width
fn inline_javascript() -> &'static str {
    r#"
(function() {
    var chart = window.__hgChart;
    var root = document.getElementById('heatmap');
    if (!chart || !root) return;

    function clearHover() {
        root.querySelectorAll('.hover-info').forEach(function(el) { el.remove(); });
    }

    // Enter is authoritative: it replaces any tooltip still showing
    function onEnter(tile) {
        clearHover();
        if (!chart.showTooltip) return;
        var row = parseInt(tile.dataset.row, 10);
        var col = parseInt(tile.dataset.col, 10);
        var info = document.createElement('div');
        info.className = 'hover-info';
        var strong = document.createElement('strong');
        strong.textContent = tile.dataset.value === '' ? 'no data' : tile.dataset.value;
        info.appendChild(document.createTextNode(chart.rowLabels[row] + ', ' + chart.columnLabels[col] + ': '));
        info.appendChild(strong);
        tile.appendChild(info);
    }

    root.querySelectorAll('.tile').forEach(function(tile) {
        tile.addEventListener('mouseenter', function() { onEnter(tile); });
        tile.addEventListener('mouseleave', clearHover);
    });

    if (chart.fixedWidth || chart.columns < 1) return;

    function updateDimensions() {
        var width = root.getBoundingClientRect().width;
        var cellWidth = (width - chart.rowLabelWidth) / chart.columns;
        root.querySelectorAll('.tile').forEach(function(tile) {
            tile.style.width = cellWidth + 'px';
        });
        root.querySelectorAll('.column-label-container').forEach(function(el, index) {
            el.style.minWidth = cellWidth + 'px';
            var text = el.firstElementChild;
            text.style.height = cellWidth + 'px';
            text.style.lineHeight = cellWidth + 'px';
            text.style.top = '-' + Math.floor(cellWidth / 2) + 'px';
            var visible = (!chart.showIntervalColumn && cellWidth > 20) || index % 3 === 0;
            text.textContent = visible ? chart.columnLabels[index] : '';
        });
    }

    window.addEventListener('resize', updateDimensions);
    window.addEventListener('pagehide', function() {
        window.removeEventListener('resize', updateDimensions);
    });
    updateDimensions();
})();
"#
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
