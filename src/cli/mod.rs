//! Command-line parsing for the back-extrapolation tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline/estimation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{
    ChartKind, DEFAULT_DEATH_RATE, DEFAULT_DEATH_RATE_SYMPTOMATIC, DEFAULT_OFFSET_DAYS, Scale,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "backcast",
    version,
    about = "COVID-19 infection back-extrapolation from reported deaths"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the daily feed, print summary + tables, and optionally chart/export.
    Report(ReportArgs),
    /// Print the estimate table only (useful for scripting).
    Estimates(ReportArgs),
    /// Re-render charts from a previously exported series JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `backcast report`, but renders
    /// charts in a terminal UI using Ratatui.
    Tui(ReportArgs),
}

/// Common options for reporting and estimating.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Feed URL (defaults to the covidtracking.com US daily endpoint,
    /// overridable via COVID_TRACKING_URL).
    #[arg(long)]
    pub url: Option<String>,

    /// Days between infection and death.
    #[arg(long, default_value_t = DEFAULT_OFFSET_DAYS)]
    pub offset_days: i64,

    /// Case-fatality ratio across all infections.
    #[arg(long, default_value_t = DEFAULT_DEATH_RATE)]
    pub death_rate: f64,

    /// Case-fatality ratio among symptomatic cases only.
    #[arg(long, default_value_t = DEFAULT_DEATH_RATE_SYMPTOMATIC)]
    pub death_rate_symptomatic: f64,

    /// Which chart to render.
    #[arg(long, value_enum, default_value_t = ChartKind::Infections)]
    pub chart: ChartKind,

    /// Y-axis scale for charts.
    #[arg(long, value_enum, default_value_t = Scale::Linear)]
    pub scale: Scale,

    /// Rows shown in the tables.
    #[arg(long, default_value_t = 10)]
    pub tail: usize,

    /// Render an ASCII chart in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-day results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full series (params + records + estimates) to JSON.
    #[arg(long = "export-series")]
    pub export_series: Option<PathBuf>,

    /// Write a markdown debug bundle after the run.
    #[arg(long)]
    pub debug_bundle: bool,
}

/// Options for plotting a saved series.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Series JSON file produced by `backcast report --export-series`.
    #[arg(long, value_name = "JSON")]
    pub series: PathBuf,

    /// Which chart to render.
    #[arg(long, value_enum, default_value_t = ChartKind::Infections)]
    pub chart: ChartKind,

    /// Y-axis scale.
    #[arg(long, value_enum, default_value_t = Scale::Linear)]
    pub scale: Scale,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
