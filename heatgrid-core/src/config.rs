//! Chart configuration files for heatgrid
//!
//! Loads a heatmap definition (data, labels, display options) from JSON.
//!
//! Search order:
//! 1. Explicit path (--config / positional CLI argument)
//! 2. `.heatgridrc.json` in the working directory
//! 3. `heatgrid.config.json` in the working directory
//!
//! Every field is optional and falls back to the component defaults; an
//! omitted `data` is the empty `[[]]` matrix. CLI flags take precedence over config file values.

use crate::bucket::{BLUES, GRAY};
use crate::heatmap::{ColumnLabelPosition, Heatmap, HeatmapOptions, DEFAULT_CELL_SIZE};
use crate::matrix::Cell;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names probed by [`discover_config`], in order
pub const CONFIG_FILE_NAMES: &[&str] = &[".heatgridrc.json", "heatgrid.config.json"];

/// Heatmap definition as written in a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeatgridConfig {
    /// Rows of cell values; `null` marks a cell without data (default: `[[]]`)
    #[serde(default)]
    pub data: Option<Vec<Vec<Cell>>>,

    /// One label per matrix row
    #[serde(default)]
    pub row_labels: Vec<String>,

    /// One label per matrix column
    #[serde(default)]
    pub column_labels: Vec<String>,

    /// Cell height in pixels (default: 40)
    #[serde(default)]
    pub cell_height: Option<f64>,

    /// Cell width in pixels when `fixed_width` is true (default: 40)
    #[serde(default)]
    pub cell_width: Option<f64>,

    /// Use `cell_width` for every cell instead of filling the container (default: true)
    #[serde(default)]
    pub fixed_width: Option<bool>,

    /// Color scale from lowest to highest bucket (default: 5-step blue)
    #[serde(default)]
    pub colors: Option<Vec<String>>,

    /// Color for missing and minimum values (default: light gray)
    #[serde(default)]
    pub no_data_color: Option<String>,

    /// Draw the "Less ... More" legend strip (default: true)
    #[serde(default)]
    pub show_legend: Option<bool>,

    /// Show the hover tooltip (default: true)
    #[serde(default)]
    pub show_tooltip: Option<bool>,

    /// Label only every third column (default: false)
    #[serde(default)]
    pub show_interval_column: Option<bool>,

    /// `top` or `bottom` (default: bottom)
    #[serde(default)]
    pub column_label_position: Option<ColumnLabelPosition>,

    /// Container width used for static responsive layout
    #[serde(default)]
    pub container_width: Option<f64>,

    /// Page title for HTML output
    #[serde(default)]
    pub title: Option<String>,
}

/// Validated configuration, ready to render
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub heatmap: Heatmap,
    /// Width of the container the chart is laid out in, if known
    pub container_width: Option<f64>,
    pub title: Option<String>,
    /// Path the config was loaded from (None if built in memory)
    pub config_path: Option<PathBuf>,
}

impl HeatgridConfig {
    /// Component options with defaults applied
    pub fn options(&self) -> HeatmapOptions {
        HeatmapOptions {
            data: self.data.clone().unwrap_or_else(|| vec![vec![]]),
            row_labels: self.row_labels.clone(),
            column_labels: self.column_labels.clone(),
            cell_height: self.cell_height.unwrap_or(DEFAULT_CELL_SIZE),
            cell_width: self.cell_width.unwrap_or(DEFAULT_CELL_SIZE),
            fixed_width: self.fixed_width.unwrap_or(true),
            colors: self
                .colors
                .clone()
                .unwrap_or_else(|| BLUES.iter().map(|c| c.to_string()).collect()),
            no_data_color: self
                .no_data_color
                .clone()
                .unwrap_or_else(|| GRAY.to_string()),
            show_legend: self.show_legend.unwrap_or(true),
            show_tooltip: self.show_tooltip.unwrap_or(true),
            show_interval_column: self.show_interval_column.unwrap_or(false),
            column_label_position: self.column_label_position.unwrap_or_default(),
        }
    }

    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }

    /// Resolve config into a validated heatmap
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        if let Some(width) = self.container_width {
            if !width.is_finite() || width <= 0.0 {
                anyhow::bail!("container_width must be positive (got {})", width);
            }
        }
        for (i, color) in self.colors.iter().flatten().enumerate() {
            if color.trim().is_empty() {
                anyhow::bail!("colors[{}] must not be empty", i);
            }
        }

        let heatmap = Heatmap::new(self.options()).context("invalid heatmap definition")?;

        Ok(ResolvedConfig {
            heatmap,
            container_width: self.container_width,
            title: self.title.clone(),
            config_path: None,
        })
    }
}

/// Discover a config file in `dir`
///
/// Returns `None` if no config file is found.
pub fn discover_config(dir: &Path) -> Result<Option<(HeatgridConfig, PathBuf)>> {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<HeatgridConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: HeatgridConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `dir`. Fails if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = match config_path {
        Some(path) => (load_config_file(path)?, path.to_path_buf()),
        None => discover_config(dir)?.with_context(|| {
            format!(
                "no config file found in {} (looked for {})",
                dir.display(),
                CONFIG_FILE_NAMES.join(", ")
            )
        })?,
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = Some(source_path);
    Ok(resolved)
}
