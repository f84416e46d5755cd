//! Shared pipeline logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> clean -> back-extrapolate -> join unaccounted cases
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::{CovidClient, RawRecord};
use crate::domain::{DailySeries, DatePoint, EstimateRecord, RunConfig};
use crate::error::AppError;
use crate::estimate::back_extrapolate;
use crate::io::ingest::clean_records;
use crate::report::unaccounted_cases;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub daily: DailySeries,
    pub estimates: Vec<EstimateRecord>,
    pub unaccounted: Vec<DatePoint>,
    pub rows_fetched: usize,
    pub source_url: String,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_report(config: &RunConfig) -> Result<RunOutput, AppError> {
    // 1) One blocking fetch.
    let client = CovidClient::from_env(config.url.as_deref());
    let raw = client.fetch_daily()?;

    run_report_with_records(config, &raw, client.url().to_string())
}

/// Execute the pipeline with pre-fetched raw records.
///
/// This is useful for the TUI (recompute with new params without refetching)
/// and for tests (no network).
pub fn run_report_with_records(
    config: &RunConfig,
    raw: &[RawRecord],
    source_url: String,
) -> Result<RunOutput, AppError> {
    config.params.validate()?;

    // 2) Clean: drop provenance, parse dates, sort, zero-fill.
    let daily = clean_records(raw)?;

    // 3) Back-extrapolate infections from deaths.
    let estimates = back_extrapolate(&daily, &config.params);

    // 4) Join the unaccounted-cases series by date.
    let unaccounted = unaccounted_cases(&estimates, &daily);

    Ok(RunOutput {
        daily,
        estimates,
        unaccounted,
        rows_fetched: raw.len(),
        source_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::data::parse_records;
    use crate::domain::{ChartKind, EstimateParams, Scale};

    fn config() -> RunConfig {
        RunConfig {
            url: None,
            params: EstimateParams::default(),
            chart: ChartKind::Infections,
            scale: Scale::Linear,
            tail_rows: 10,
            plot: false,
            plot_width: 100,
            plot_height: 25,
            export_results: None,
            export_series: None,
            debug_bundle: false,
        }
    }

    #[test]
    fn pipeline_end_to_end_from_feed_body() {
        // Out-of-order records with a null death and provenance fields, as the
        // feed serves them.
        let body = r#"[
            {"date": 20200317, "positive": 100, "death": 10, "hash": "x", "dateChecked": "y"},
            {"date": 20200315, "positive": 50, "death": null, "hash": "z", "dateChecked": "w"}
        ]"#;
        let raw = parse_records(body).unwrap();
        let run = run_report_with_records(&config(), &raw, "test://feed".to_string()).unwrap();

        assert_eq!(run.rows_fetched, 2);
        assert_eq!(run.daily.len(), 2);
        assert_eq!(
            run.daily.first().unwrap().date,
            NaiveDate::from_ymd_opt(2020, 3, 15).unwrap()
        );
        assert_eq!(run.daily.first().unwrap().death, 0);

        assert_eq!(run.estimates.len(), 2);
        assert_eq!(
            run.estimates[1].date,
            NaiveDate::from_ymd_opt(2020, 3, 3).unwrap()
        );

        // Shifted dates (Mar 01, Mar 03) precede the reported range, so the
        // inner join yields no unaccounted points here.
        assert!(run.unaccounted.is_empty());
    }

    #[test]
    fn pipeline_rejects_invalid_params() {
        let mut config = config();
        config.params.death_rate = -1.0;

        let raw = parse_records(r#"[{"date": 20200317, "death": 1}]"#).unwrap();
        let err = run_report_with_records(&config, &raw, String::new()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Usage);
    }
}
