//! Debug bundle writer for inspecting feed inputs and derived series.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::app::pipeline::RunOutput;
use crate::domain::RunConfig;
use crate::error::{AppError, ErrorKind};

/// Rows dumped per table. Enough context to eyeball the join without making
/// the bundle unwieldy for a year-long feed.
const BUNDLE_ROWS: usize = 30;

pub fn write_debug_bundle(run: &RunOutput, config: &RunConfig) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let asof = run
        .daily
        .last()
        .map(|r| r.date.format("%Y%m%d").to_string())
        .unwrap_or_else(|| "empty".to_string());
    let path = dir.join(format!("backcast_debug_{asof}_{ts}.md"));

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to create debug file: {e}")))?;

    let w = |file: &mut File, line: String| -> Result<(), AppError> {
        writeln!(file, "{line}")
            .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write debug: {e}")))
    };

    w(&mut file, "# backcast debug bundle".to_string())?;
    w(&mut file, format!("- generated: {}", Local::now().to_rfc3339()))?;
    w(&mut file, format!("- source_url: {}", run.source_url))?;
    w(&mut file, format!("- rows_fetched: {}", run.rows_fetched))?;
    w(&mut file, format!("- rows_cleaned: {}", run.daily.len()))?;
    w(
        &mut file,
        format!(
            "- params: offset={}d, death_rate={:.4}, death_rate_symptomatic={:.4}",
            config.params.offset_days,
            config.params.death_rate,
            config.params.death_rate_symptomatic
        ),
    )?;
    if let (Some(first), Some(last)) = (run.daily.first(), run.daily.last()) {
        w(
            &mut file,
            format!("- date_range: {}..{}", first.date, last.date),
        )?;
    }

    w(&mut file, "\n## Reported series (tail)".to_string())?;
    w(&mut file, "| date | day | positive | death |".to_string())?;
    w(&mut file, "| - | - | - | - |".to_string())?;
    for r in tail(run.daily.records(), BUNDLE_ROWS) {
        w(
            &mut file,
            format!("| {} | {} | {} | {} |", r.date, r.day_label, r.positive, r.death),
        )?;
    }

    w(&mut file, "\n## Back-extrapolated estimates (tail)".to_string())?;
    w(
        &mut file,
        "| date | day | infected | symptomatic |".to_string(),
    )?;
    w(&mut file, "| - | - | - | - |".to_string())?;
    for e in tail(&run.estimates, BUNDLE_ROWS) {
        w(
            &mut file,
            format!(
                "| {} | {} | {:.2} | {:.2} |",
                e.date, e.day_label, e.infected, e.symptomatic
            ),
        )?;
    }

    w(&mut file, "\n## Unaccounted cases (tail)".to_string())?;
    w(&mut file, "| date | day | unaccounted |".to_string())?;
    w(&mut file, "| - | - | - |".to_string())?;
    for p in tail(&run.unaccounted, BUNDLE_ROWS) {
        w(
            &mut file,
            format!("| {} | {} | {:.2} |", p.date, p.day_label, p.value),
        )?;
    }

    Ok(path)
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    let start = items.len().saturating_sub(n);
    &items[start..]
}
