//! Read/write series JSON files.
//!
//! Series JSON is the "portable" representation of one run:
//! - the params used for the back-extrapolation
//! - the cleaned daily records
//! - the estimates and the joined unaccounted-cases series
//!
//! `backcast plot` reloads these files to re-render charts without
//! refetching. The schema is defined by `domain::SeriesFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{DailySeries, DatePoint, EstimateParams, EstimateRecord, SeriesFile};
use crate::error::{AppError, ErrorKind};

/// Write a series JSON file.
pub fn write_series_json(
    path: &Path,
    daily: &DailySeries,
    estimates: &[EstimateRecord],
    unaccounted: &[DatePoint],
    params: &EstimateParams,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to create series JSON '{}': {e}", path.display()),
        )
    })?;

    let series = SeriesFile {
        tool: "backcast".to_string(),
        params: *params,
        daily: daily.records().to_vec(),
        estimates: estimates.to_vec(),
        unaccounted: unaccounted.to_vec(),
    };

    serde_json::to_writer_pretty(file, &series)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write series JSON: {e}")))?;

    Ok(())
}

/// Read a series JSON file.
pub fn read_series_json(path: &Path) -> Result<SeriesFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to open series JSON '{}': {e}", path.display()),
        )
    })?;
    let series: SeriesFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Invalid series JSON: {e}")))?;
    Ok(series)
}

/// Rebuild the sorted daily series from a loaded file.
///
/// Loaded records go back through the same invariant checks as a fresh run,
/// so a hand-edited file with duplicate dates fails the same way the feed
/// would.
pub fn daily_from_file(series: &SeriesFile) -> Result<DailySeries, AppError> {
    DailySeries::from_records(series.daily.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{DailyRecord, day_label};
    use crate::estimate::back_extrapolate;
    use crate::report::unaccounted_cases;

    #[test]
    fn series_file_round_trips_through_json() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 17).unwrap();
        let daily = DailySeries::from_records(vec![DailyRecord {
            date,
            day_label: day_label(date),
            positive: 100,
            death: 10,
        }])
        .unwrap();

        let params = EstimateParams::default();
        let estimates = back_extrapolate(&daily, &params);
        let unaccounted = unaccounted_cases(&estimates, &daily);

        let series = SeriesFile {
            tool: "backcast".to_string(),
            params,
            daily: daily.records().to_vec(),
            estimates: estimates.clone(),
            unaccounted,
        };

        let text = serde_json::to_string(&series).unwrap();
        assert!(text.contains("\"day\":\"Mar 17\""));

        let loaded: SeriesFile = serde_json::from_str(&text).unwrap();
        assert_eq!(loaded.daily, daily.records());
        assert_eq!(loaded.estimates, estimates);
        assert_eq!(daily_from_file(&loaded).unwrap(), daily);
    }
}
