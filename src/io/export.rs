//! Export per-day results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per cleaned daily record with its paired estimate.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{DailySeries, EstimateRecord};
use crate::error::{AppError, ErrorKind};

/// Write the cleaned series and its estimates to a CSV file.
///
/// Estimates are paired by input order (one estimate per daily record), so
/// both the reported date and the back-shifted estimate date appear on each
/// row.
pub fn write_results_csv(
    path: &Path,
    daily: &DailySeries,
    estimates: &[EstimateRecord],
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(
        file,
        "date,day,positive,death,estimate_date,estimate_day,infected,symptomatic"
    )
    .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write export CSV header: {e}")))?;

    for (record, est) in daily.iter().zip(estimates) {
        writeln!(
            file,
            "{},{},{},{},{},{},{:.4},{:.4}",
            record.date,
            record.day_label,
            record.positive,
            record.death,
            est.date,
            est.day_label,
            est.infected,
            est.symptomatic,
        )
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
