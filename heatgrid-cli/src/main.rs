//! heatgrid CLI - render heatmap charts to HTML, JSON, or text

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use heatgrid_core::config::{self, ResolvedConfig};
use heatgrid_core::demo;
use heatgrid_core::{render, WidthMode};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Default HTML output path when `--output` is not given
const DEFAULT_HTML_OUTPUT: &str = "heatmap.html";

#[derive(Parser)]
#[command(name = "heatgrid")]
#[command(about = "Render heatmap charts from JSON configs")]
#[command(version = env!("HEATGRID_VERSION"))]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a chart described by a JSON config file
    Render {
        /// Path to chart config file
        config: PathBuf,

        #[command(flatten)]
        render: RenderArgs,

        /// Lay cells out to fill the container instead of using a fixed width
        #[arg(long)]
        responsive: bool,
    },
    /// Render the built-in sample chart
    Demo {
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Validate or inspect a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Output format
    #[arg(long, default_value = "html")]
    format: OutputFormat,

    /// Output file path (HTML default: heatmap.html, otherwise stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Container width in pixels (overrides config file)
    #[arg(long)]
    width: Option<f64>,

    /// Render with a cell hovered, as ROW,COL
    #[arg(long, value_parser = parse_cell)]
    hover: Option<(usize, usize)>,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without rendering
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved chart configuration (defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Html,
    Json,
    Text,
}

impl From<OutputFormat> for heatgrid_core::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Html => heatgrid_core::OutputFormat::Html,
            OutputFormat::Json => heatgrid_core::OutputFormat::Json,
            OutputFormat::Text => heatgrid_core::OutputFormat::Text,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render {
            config: config_path,
            render: args,
            responsive,
        } => {
            let config_dir = config_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let mut resolved = config::load_and_resolve(&config_dir, Some(&config_path))
                .context("failed to load configuration")?;

            if let Some(p) = &resolved.config_path {
                eprintln!("Using config: {}", p.display());
            }
            tracing::debug!(
                rows = resolved.heatmap.matrix().row_count(),
                columns = resolved.heatmap.matrix().column_count(),
                responsive,
                "loaded chart config"
            );

            if responsive {
                resolved.heatmap = resolved
                    .heatmap
                    .with_width_mode(WidthMode::Responsive)
                    .context("cannot switch chart to responsive width")?;
            }
            emit(resolved, &args)?;
        }
        Commands::Demo { render: args } => {
            // A container width makes the sample fill it; otherwise cells are fixed
            let heatmap = demo::sample_heatmap(args.width.is_none())?;
            let resolved = ResolvedConfig {
                heatmap,
                container_width: None,
                title: Some("Heatmap Chart".to_string()),
                config_path: None,
            };
            emit(resolved, &args)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                match config::load_and_resolve(&project_root, path.as_deref()) {
                    Ok(resolved) => {
                        if let Some(ref p) = resolved.config_path {
                            println!("Config valid: {}", p.display());
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

/// Install the stderr log subscriber
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Apply shared render flags, render, and write the result
fn emit(mut resolved: ResolvedConfig, args: &RenderArgs) -> anyhow::Result<()> {
    if let Some(width) = args.width {
        if !width.is_finite() || width <= 0.0 {
            anyhow::bail!("--width must be positive (got {})", width);
        }
        resolved.container_width = Some(width);
    }

    let output = render(&resolved, args.format.into(), args.hover)?;

    match (args.format, &args.output) {
        (OutputFormat::Html, None) => {
            let path = PathBuf::from(DEFAULT_HTML_OUTPUT);
            write_output(&path, &output)?;
            eprintln!("Wrote {}", path.display());
        }
        (_, Some(path)) => {
            write_output(path, &output)?;
            eprintln!("Wrote {}", path.display());
        }
        (OutputFormat::Json, None) => println!("{}", output),
        (OutputFormat::Text, None) => print!("{}", output),
    }

    Ok(())
}

fn print_config(resolved: &ResolvedConfig) {
    let heatmap = &resolved.heatmap;

    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    }
    if let Some(ref title) = resolved.title {
        println!("  Title: {}", title);
    }
    println!();
    println!("Grid:");
    println!("  rows: {}", heatmap.matrix().row_count());
    println!("  columns: {}", heatmap.matrix().column_count());
    println!();
    println!("Layout:");
    match heatmap.width_mode() {
        WidthMode::Fixed(width) => println!("  cell width: {} (fixed)", width),
        WidthMode::Responsive => println!("  cell width: responsive"),
    }
    println!("  cell height: {}", heatmap.cell_height());
    println!(
        "  container width: {}",
        resolved
            .container_width
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!(
        "  column labels: {}",
        heatmap.column_label_position.as_str()
    );
    println!();
    println!("Colors:");
    println!("  no data: {}", heatmap.scale().no_data());
    println!("  scale: {}", heatmap.scale().colors().join(", "));
    println!();
    println!("Display:");
    println!("  legend: {}", heatmap.show_legend);
    println!("  tooltip: {}", heatmap.show_tooltip);
    println!("  interval columns: {}", heatmap.show_interval_column);
}

/// Parse a `ROW,COL` cell coordinate
fn parse_cell(s: &str) -> Result<(usize, usize), String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL (got '{}')", s))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row index '{}'", row.trim()))?;
    let col = col
        .trim()
        .parse()
        .map_err(|_| format!("invalid column index '{}'", col.trim()))?;
    Ok((row, col))
}

/// Write output to file with atomic write pattern
fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    use std::fs;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents)
        .with_context(|| format!("Failed to write temporary file: {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}
