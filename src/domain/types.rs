//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during a run
//! - exported to JSON/CSV
//! - reloaded later for plotting without refetching

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};

/// Default infection-to-death lag in days.
pub const DEFAULT_OFFSET_DAYS: i64 = 14;

/// Default case-fatality ratio across all infections (0.66%).
pub const DEFAULT_DEATH_RATE: f64 = 0.0066;

/// Default case-fatality ratio among symptomatic cases (1.38%).
pub const DEFAULT_DEATH_RATE_SYMPTOMATIC: f64 = 0.0138;

/// Derive the short display label for a date, e.g. `Mar 17`.
///
/// `%d` is zero-padded, so `2020-03-03` becomes `Mar 03`.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// One cleaned daily observation.
///
/// Only the fields the analysis actually consumes are carried; everything else
/// in the feed is dropped during ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Short display label derived from `date` (`%b %d`).
    #[serde(rename = "day")]
    pub day_label: String,
    /// Cumulative positive tests. Null/absent in the feed becomes 0.
    pub positive: i64,
    /// Cumulative deaths. Null/absent in the feed becomes 0.
    pub death: i64,
}

/// The cleaned collection: sorted ascending by date, one record per date.
///
/// Supports both ordered iteration (for tables/charts) and lookup-by-date
/// (for the join in the unaccounted-cases series). Lookup is a binary search
/// over the sorted backing vector rather than a side map, so the two views
/// can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySeries {
    records: Vec<DailyRecord>,
}

impl DailySeries {
    /// Build a series from records in any order.
    ///
    /// Sorts ascending by date and rejects duplicate dates: the feed's
    /// contract is one record per date, so a duplicate is a data-quality bug
    /// we refuse to guess a resolution for.
    pub fn from_records(mut records: Vec<DailyRecord>) -> Result<Self, AppError> {
        records.sort_by_key(|r| r.date);
        for pair in records.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(AppError::new(
                    ErrorKind::Schema,
                    format!("Duplicate report date {} in feed.", pair[0].date),
                ));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&DailyRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&DailyRecord> {
        self.records.last()
    }

    /// Lookup by date.
    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|idx| &self.records[idx])
    }

    pub fn into_records(self) -> Vec<DailyRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a DailySeries {
    type Item = &'a DailyRecord;
    type IntoIter = std::slice::Iter<'a, DailyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Constants for the back-extrapolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateParams {
    /// Days between infection and death.
    pub offset_days: i64,
    /// Case-fatality ratio across all infections.
    pub death_rate: f64,
    /// Case-fatality ratio among symptomatic cases only.
    pub death_rate_symptomatic: f64,
}

impl Default for EstimateParams {
    fn default() -> Self {
        Self {
            offset_days: DEFAULT_OFFSET_DAYS,
            death_rate: DEFAULT_DEATH_RATE,
            death_rate_symptomatic: DEFAULT_DEATH_RATE_SYMPTOMATIC,
        }
    }
}

impl EstimateParams {
    /// Validate once per run so the estimator itself stays total.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.offset_days < 0 {
            return Err(AppError::new(
                ErrorKind::Usage,
                "Offset days must be non-negative.",
            ));
        }
        if !(self.death_rate.is_finite() && self.death_rate > 0.0) {
            return Err(AppError::new(
                ErrorKind::Usage,
                "Death rate must be finite and > 0.",
            ));
        }
        if !(self.death_rate_symptomatic.is_finite() && self.death_rate_symptomatic > 0.0) {
            return Err(AppError::new(
                ErrorKind::Usage,
                "Symptomatic death rate must be finite and > 0.",
            ));
        }
        Ok(())
    }
}

/// One back-extrapolated estimate, derived from a single `DailyRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRecord {
    /// Source date shifted back by `offset_days`. May precede the first
    /// observed date; the shift is not clamped.
    pub date: NaiveDate,
    #[serde(rename = "day")]
    pub day_label: String,
    /// `death / death_rate`.
    pub infected: f64,
    /// `death / death_rate_symptomatic`.
    pub symptomatic: f64,
}

/// One point of a derived date-keyed series (e.g. unaccounted cases).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatePoint {
    pub date: NaiveDate,
    #[serde(rename = "day")]
    pub day_label: String,
    pub value: f64,
}

/// Which chart to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Reported positive tests.
    Positive,
    /// Reported deaths.
    Deaths,
    /// Back-extrapolated vs. reported infections (three-series overlay).
    Infections,
    /// Estimated cases with no matching positive test.
    Unaccounted,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Positive,
        ChartKind::Deaths,
        ChartKind::Infections,
        ChartKind::Unaccounted,
    ];

    /// Human-readable chart title.
    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Positive => "Positive Tests",
            ChartKind::Deaths => "Deaths",
            ChartKind::Infections => "Back-extrapolated vs. reported infections",
            ChartKind::Unaccounted => "Estimated Unaccounted Cases",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ChartKind::Positive => ChartKind::Deaths,
            ChartKind::Deaths => ChartKind::Infections,
            ChartKind::Infections => ChartKind::Unaccounted,
            ChartKind::Unaccounted => ChartKind::Positive,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ChartKind::Positive => ChartKind::Unaccounted,
            ChartKind::Deaths => ChartKind::Positive,
            ChartKind::Infections => ChartKind::Deaths,
            ChartKind::Unaccounted => ChartKind::Infections,
        }
    }
}

// Display renders the CLI token (clap's `default_value_t` needs it).
impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ChartKind::Positive => "positive",
            ChartKind::Deaths => "deaths",
            ChartKind::Infections => "infections",
            ChartKind::Unaccounted => "unaccounted",
        })
    }
}

/// Y-axis scale for charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Linear,
    /// Log base 10. Non-positive values are skipped when drawing.
    Log,
}

impl Scale {
    pub fn display_name(self) -> &'static str {
        match self {
            Scale::Linear => "linear",
            Scale::Log => "log",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Scale::Linear => Scale::Log,
            Scale::Log => Scale::Linear,
        }
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Feed URL override (`--url` beats `COVID_TRACKING_URL` beats built-in).
    pub url: Option<String>,
    pub params: EstimateParams,

    pub chart: ChartKind,
    pub scale: Scale,

    /// Rows shown in head/tail tables.
    pub tail_rows: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_series: Option<PathBuf>,
    pub debug_bundle: bool,
}

/// A saved series file (JSON), reloadable by `backcast plot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    pub params: EstimateParams,
    pub daily: Vec<DailyRecord>,
    pub estimates: Vec<EstimateRecord>,
    pub unaccounted: Vec<DatePoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(y: i32, m: u32, d: u32, positive: i64, death: i64) -> DailyRecord {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        DailyRecord {
            date,
            day_label: day_label(date),
            positive,
            death,
        }
    }

    #[test]
    fn day_label_is_month_abbrev_and_padded_day() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 3).unwrap();
        assert_eq!(day_label(date), "Mar 03");
        let date = NaiveDate::from_ymd_opt(2020, 3, 17).unwrap();
        assert_eq!(day_label(date), "Mar 17");
    }

    #[test]
    fn series_sorts_ascending() {
        let series = DailySeries::from_records(vec![
            record(2020, 3, 17, 200, 20),
            record(2020, 3, 15, 100, 10),
        ])
        .unwrap();

        let dates: Vec<NaiveDate> = series.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2020, 3, 15).unwrap(),
                NaiveDate::from_ymd_opt(2020, 3, 17).unwrap(),
            ]
        );
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let err = DailySeries::from_records(vec![
            record(2020, 3, 17, 200, 20),
            record(2020, 3, 17, 201, 20),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Schema);
    }

    #[test]
    fn series_lookup_by_date() {
        let series = DailySeries::from_records(vec![
            record(2020, 3, 15, 100, 10),
            record(2020, 3, 17, 200, 20),
        ])
        .unwrap();

        let hit = series.get(NaiveDate::from_ymd_opt(2020, 3, 17).unwrap());
        assert_eq!(hit.map(|r| r.positive), Some(200));
        assert!(series.get(NaiveDate::from_ymd_opt(2020, 3, 16).unwrap()).is_none());
    }

    #[test]
    fn default_params_validate() {
        assert!(EstimateParams::default().validate().is_ok());

        let bad = EstimateParams {
            death_rate: 0.0,
            ..EstimateParams::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn chart_cycle_covers_all_kinds() {
        let mut chart = ChartKind::Positive;
        for _ in 0..ChartKind::ALL.len() {
            chart = chart.next();
        }
        assert_eq!(chart, ChartKind::Positive);
        assert_eq!(ChartKind::Deaths.next().prev(), ChartKind::Deaths);
    }
}
