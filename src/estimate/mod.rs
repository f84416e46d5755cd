//! Back-extrapolation of infections from reported deaths.
//!
//! Deaths are tracked more reliably than infections (testing lags), so each
//! day's death count is projected back by the average infection-to-death lag
//! and divided by a case-fatality ratio to estimate how many people were
//! infected on that earlier day. Two ratios are carried: one over all
//! infections and one over symptomatic cases only.
//!
//! The computation is pure and total for validated params: calendar
//! subtraction is unclamped (estimate dates may precede the first observed
//! date) and division by a validated nonzero rate never fails.

use chrono::Duration;

use crate::domain::{DailyRecord, DailySeries, EstimateParams, EstimateRecord, day_label};

/// Apply the estimator across the full cleaned series.
///
/// Output order = input order. Since the input is sorted ascending and the
/// shift is a constant offset, the output is internally sorted as well.
pub fn back_extrapolate(daily: &DailySeries, params: &EstimateParams) -> Vec<EstimateRecord> {
    daily.iter().map(|r| estimate_record(r, params)).collect()
}

/// Derive one estimate from one daily record.
pub fn estimate_record(record: &DailyRecord, params: &EstimateParams) -> EstimateRecord {
    let date = record.date - Duration::days(params.offset_days);
    EstimateRecord {
        date,
        day_label: day_label(date),
        infected: record.death as f64 / params.death_rate,
        symptomatic: record.death as f64 / params.death_rate_symptomatic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn daily(y: i32, m: u32, d: u32, death: i64) -> DailyRecord {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        DailyRecord {
            date,
            day_label: day_label(date),
            positive: 0,
            death,
        }
    }

    #[test]
    fn scenario_march_17() {
        let record = daily(2020, 3, 17, 10);
        let est = estimate_record(&record, &EstimateParams::default());

        assert_eq!(est.date, NaiveDate::from_ymd_opt(2020, 3, 3).unwrap());
        assert_eq!(est.day_label, "Mar 03");
        assert!((est.infected - 10.0 / 0.0066).abs() < 1e-9);
        assert!((est.symptomatic - 10.0 / 0.0138).abs() < 1e-9);
        // Sanity on the published magnitudes.
        assert!((est.infected - 1515.15).abs() < 0.01);
        assert!((est.symptomatic - 724.64).abs() < 0.01);
    }

    #[test]
    fn zero_deaths_give_zero_estimates() {
        let est = estimate_record(&daily(2020, 3, 17, 0), &EstimateParams::default());
        assert_eq!(est.infected, 0.0);
        assert_eq!(est.symptomatic, 0.0);
    }

    #[test]
    fn estimator_is_linear_in_deaths() {
        let params = EstimateParams::default();
        let once = estimate_record(&daily(2020, 3, 17, 7), &params);
        let twice = estimate_record(&daily(2020, 3, 17, 14), &params);

        assert!((twice.infected - 2.0 * once.infected).abs() < 1e-9);
        assert!((twice.symptomatic - 2.0 * once.symptomatic).abs() < 1e-9);
    }

    #[test]
    fn date_shift_is_exact_for_every_record() {
        let series = DailySeries::from_records(vec![
            daily(2020, 3, 1, 1),
            daily(2020, 3, 15, 5),
            daily(2020, 4, 2, 9),
        ])
        .unwrap();

        let params = EstimateParams::default();
        let estimates = back_extrapolate(&series, &params);
        assert_eq!(estimates.len(), series.len());

        for (record, est) in series.iter().zip(&estimates) {
            assert_eq!(est.date, record.date - Duration::days(14));
        }

        // The unclamped shift may precede the first observed date.
        assert!(estimates[0].date < series.first().unwrap().date);
    }

    #[test]
    fn output_order_matches_input_order() {
        let series = DailySeries::from_records(vec![
            daily(2020, 3, 20, 3),
            daily(2020, 3, 18, 2),
        ])
        .unwrap();

        let estimates = back_extrapolate(&series, &EstimateParams::default());
        let dates: Vec<NaiveDate> = estimates.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2020, 3, 4).unwrap(),
                NaiveDate::from_ymd_opt(2020, 3, 6).unwrap(),
            ]
        );
    }
}
