//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches and cleans the daily feed
//! - runs the back-extrapolation
//! - prints reports/charts
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, PlotArgs, ReportArgs};
use crate::domain::{RunConfig, SeriesFile};
use crate::error::AppError;
use crate::io::series::daily_from_file;

pub mod pipeline;

/// Entry point for the `backcast` binary.
pub fn run() -> Result<(), AppError> {
    // We want `backcast` and `backcast --chart deaths` to behave like
    // `backcast report ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args, OutputMode::Full),
        Command::Estimates(args) => handle_report(args, OutputMode::EstimatesOnly),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    EstimatesOnly,
}

fn handle_report(args: ReportArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_report(&config)?;

    // Print terminal output.
    match mode {
        OutputMode::Full => {
            println!(
                "{}",
                crate::report::format::format_run_summary(
                    &run.daily,
                    &run.estimates,
                    &run.unaccounted,
                    &config
                )
            );
            println!(
                "{}",
                crate::report::format::format_daily_table(run.daily.records(), config.tail_rows)
            );
        }
        OutputMode::EstimatesOnly => {}
    }

    println!(
        "{}",
        crate::report::format::format_estimate_table(&run.estimates, config.tail_rows)
    );

    if mode == OutputMode::Full {
        println!(
            "{}",
            crate::report::format::format_unaccounted_table(&run.unaccounted, config.tail_rows)
        );

        if config.plot {
            let series = crate::report::chart_series(
                config.chart,
                &run.daily,
                &run.estimates,
                &run.unaccounted,
            );
            let chart = crate::plot::render_ascii_chart(
                config.chart.display_name(),
                &series,
                config.scale,
                config.plot_width,
                config.plot_height,
            );
            println!("{chart}");
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.daily, &run.estimates)?;
    }
    if let Some(path) = &config.export_series {
        crate::io::series::write_series_json(
            path,
            &run.daily,
            &run.estimates,
            &run.unaccounted,
            &config.params,
        )?;
    }
    if config.debug_bundle {
        let path = crate::debug::write_debug_bundle(&run, &config)?;
        println!("Wrote debug bundle: {}", path.display());
    }

    Ok(())
}

fn handle_tui(args: ReportArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file: SeriesFile = crate::io::series::read_series_json(&args.series)?;
    let daily = daily_from_file(&file)?;

    let series =
        crate::report::chart_series(args.chart, &daily, &file.estimates, &file.unaccounted);
    let chart = crate::plot::render_ascii_chart(
        args.chart.display_name(),
        &series,
        args.scale,
        args.width,
        args.height,
    );

    println!("{chart}");
    Ok(())
}

pub fn run_config_from_args(args: &ReportArgs) -> RunConfig {
    RunConfig {
        url: args.url.clone(),
        params: crate::domain::EstimateParams {
            offset_days: args.offset_days,
            death_rate: args.death_rate,
            death_rate_symptomatic: args.death_rate_symptomatic,
        },
        chart: args.chart,
        scale: args.scale,
        tail_rows: args.tail,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_series: args.export_series.clone(),
        debug_bundle: args.debug_bundle,
    }
}

/// Rewrite argv so `backcast` defaults to `backcast report`.
///
/// Rules:
/// - `backcast`                      -> `backcast report`
/// - `backcast --chart deaths ...`   -> `backcast report --chart deaths ...`
/// - `backcast --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "estimates" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "report flags".
    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_report() {
        assert_eq!(rewrite_args(argv(&["backcast"])), argv(&["backcast", "report"]));
    }

    #[test]
    fn leading_flag_becomes_report_flags() {
        assert_eq!(
            rewrite_args(argv(&["backcast", "--chart", "deaths"])),
            argv(&["backcast", "report", "--chart", "deaths"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["backcast", "tui"])),
            argv(&["backcast", "tui"])
        );
        assert_eq!(
            rewrite_args(argv(&["backcast", "--help"])),
            argv(&["backcast", "--help"])
        );
    }
}
