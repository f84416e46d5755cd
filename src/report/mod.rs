//! Reporting utilities: the unaccounted-cases series and chart series building.
//!
//! Renderers (ASCII plot, TUI) consume only the ordered `(label, value)`
//! series produced here, so presentation stays separate from the pipeline.

pub mod format;

use crate::domain::{ChartKind, DailySeries, DatePoint, EstimateRecord};

/// One named, ordered `(day label, value)` series ready for a rendering sink.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries {
    pub name: String,
    pub points: Vec<(String, f64)>,
}

impl LabeledSeries {
    pub fn new(name: impl Into<String>, points: Vec<(String, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// Estimated cases that never showed up as a positive test:
/// `estimated.infected - reported.positive`, joined by date.
///
/// This is an inner join: the back-shifted estimate dates start earlier than
/// the reported series, and only dates present in both produce a point.
/// Nothing is zero-filled and nothing is aligned positionally.
pub fn unaccounted_cases(estimates: &[EstimateRecord], daily: &DailySeries) -> Vec<DatePoint> {
    estimates
        .iter()
        .filter_map(|est| {
            daily.get(est.date).map(|record| DatePoint {
                date: est.date,
                day_label: est.day_label.clone(),
                value: est.infected - record.positive as f64,
            })
        })
        .collect()
}

/// Build the `(label, value)` series for a chart kind.
pub fn chart_series(
    chart: ChartKind,
    daily: &DailySeries,
    estimates: &[EstimateRecord],
    unaccounted: &[DatePoint],
) -> Vec<LabeledSeries> {
    match chart {
        ChartKind::Positive => vec![LabeledSeries::new(
            "Positive tests",
            daily
                .iter()
                .map(|r| (r.day_label.clone(), r.positive as f64))
                .collect(),
        )],
        ChartKind::Deaths => vec![LabeledSeries::new(
            "Deaths",
            daily
                .iter()
                .map(|r| (r.day_label.clone(), r.death as f64))
                .collect(),
        )],
        ChartKind::Infections => vec![
            LabeledSeries::new(
                "est. infections",
                estimates
                    .iter()
                    .map(|e| (e.day_label.clone(), e.infected))
                    .collect(),
            ),
            LabeledSeries::new(
                "est. symptomatic infections",
                estimates
                    .iter()
                    .map(|e| (e.day_label.clone(), e.symptomatic))
                    .collect(),
            ),
            LabeledSeries::new(
                "Positive tests",
                daily
                    .iter()
                    .map(|r| (r.day_label.clone(), r.positive as f64))
                    .collect(),
            ),
        ],
        ChartKind::Unaccounted => vec![LabeledSeries::new(
            "Unaccounted cases",
            unaccounted
                .iter()
                .map(|p| (p.day_label.clone(), p.value))
                .collect(),
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{DailyRecord, EstimateParams, day_label};
    use crate::estimate::back_extrapolate;

    fn daily(y: i32, m: u32, d: u32, positive: i64, death: i64) -> DailyRecord {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        DailyRecord {
            date,
            day_label: day_label(date),
            positive,
            death,
        }
    }

    fn series(records: Vec<DailyRecord>) -> DailySeries {
        DailySeries::from_records(records).unwrap()
    }

    #[test]
    fn unaccounted_joins_by_date_not_position() {
        // 30 consecutive days: estimates for day i land on day i-14, so the
        // first 14 shifted dates precede the series and must be dropped.
        let records: Vec<DailyRecord> = (1..=30)
            .map(|d| daily(2020, 3, d, 100 * d as i64, d as i64))
            .collect();
        let daily_series = series(records);

        let params = EstimateParams::default();
        let estimates = back_extrapolate(&daily_series, &params);
        let unaccounted = unaccounted_cases(&estimates, &daily_series);

        assert_eq!(unaccounted.len(), 30 - 14);
        assert_eq!(
            unaccounted[0].date,
            NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
        );

        // Mar 01 point: estimate comes from Mar 15 (death = 15), reported
        // positive on Mar 01 is 100.
        let expected = 15.0 / params.death_rate - 100.0;
        assert!((unaccounted[0].value - expected).abs() < 1e-9);
    }

    #[test]
    fn unaccounted_is_empty_without_overlap() {
        let daily_series = series(vec![daily(2020, 3, 1, 10, 1)]);
        let estimates = back_extrapolate(&daily_series, &EstimateParams::default());
        assert!(unaccounted_cases(&estimates, &daily_series).is_empty());
    }

    #[test]
    fn infections_chart_overlays_three_series() {
        let daily_series = series(vec![daily(2020, 3, 17, 100, 10)]);
        let estimates = back_extrapolate(&daily_series, &EstimateParams::default());
        let unaccounted = unaccounted_cases(&estimates, &daily_series);

        let charted = chart_series(ChartKind::Infections, &daily_series, &estimates, &unaccounted);
        assert_eq!(charted.len(), 3);
        assert_eq!(charted[0].name, "est. infections");
        assert_eq!(charted[0].points[0].0, "Mar 03");
        assert_eq!(charted[2].points[0], ("Mar 17".to_string(), 100.0));
    }

    #[test]
    fn positive_chart_uses_day_labels() {
        let daily_series = series(vec![daily(2020, 3, 15, 100, 1), daily(2020, 3, 17, 200, 2)]);
        let charted = chart_series(ChartKind::Positive, &daily_series, &[], &[]);
        assert_eq!(charted.len(), 1);
        assert_eq!(
            charted[0].points,
            vec![("Mar 15".to_string(), 100.0), ("Mar 17".to_string(), 200.0)]
        );
    }
}
