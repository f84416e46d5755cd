//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{DailyRecord, DailySeries, DatePoint, EstimateRecord, RunConfig};

/// Format the full run summary (date range + latest counts + params).
pub fn format_run_summary(
    daily: &DailySeries,
    estimates: &[EstimateRecord],
    unaccounted: &[DatePoint],
    config: &RunConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== backcast - COVID-19 infection back-extrapolation ===\n");
    match (daily.first(), daily.last()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!(
                "Reported: n={} | dates=[{}, {}]\n",
                daily.len(),
                first.date,
                last.date
            ));
            out.push_str(&format!(
                "Latest: positive={} death={} ({})\n",
                last.positive, last.death, last.day_label
            ));
        }
        _ => out.push_str("Reported: n=0\n"),
    }

    out.push_str(&format!(
        "Params: offset={}d | death_rate={:.4} | death_rate_symptomatic={:.4}\n",
        config.params.offset_days, config.params.death_rate, config.params.death_rate_symptomatic
    ));

    if let Some(last) = estimates.last() {
        out.push_str(&format!(
            "Latest estimate ({}): infected={:.0} symptomatic={:.0}\n",
            last.day_label, last.infected, last.symptomatic
        ));
    }
    if let Some(last) = unaccounted.last() {
        out.push_str(&format!(
            "Unaccounted: n={} | latest ({}): {:.0}\n",
            unaccounted.len(),
            last.day_label,
            last.value
        ));
    }
    out.push('\n');

    out
}

/// Format the tail of the cleaned daily series.
pub fn format_daily_table(records: &[DailyRecord], tail_rows: usize) -> String {
    let rows = tail(records, tail_rows);
    let mut out = String::new();

    out.push_str(&format!("Reported series (last {}):\n", rows.len()));
    out.push_str(&format!(
        "{:<12} {:<8} {:>12} {:>10}\n",
        "date", "day", "positive", "death"
    ));
    out.push_str(&format!("{:-<12} {:-<8} {:-<12} {:-<10}\n", "", "", "", ""));

    for r in rows {
        out.push_str(&format!(
            "{:<12} {:<8} {:>12} {:>10}\n",
            r.date.to_string(),
            r.day_label,
            r.positive,
            r.death
        ));
    }

    out
}

/// Format the tail of the estimate series.
pub fn format_estimate_table(estimates: &[EstimateRecord], tail_rows: usize) -> String {
    let rows = tail(estimates, tail_rows);
    let mut out = String::new();

    out.push_str(&format!("Back-extrapolated estimates (last {}):\n", rows.len()));
    out.push_str(&format!(
        "{:<12} {:<8} {:>14} {:>14}\n",
        "date", "day", "infected", "symptomatic"
    ));
    out.push_str(&format!("{:-<12} {:-<8} {:-<14} {:-<14}\n", "", "", "", ""));

    for e in rows {
        out.push_str(&format!(
            "{:<12} {:<8} {:>14.2} {:>14.2}\n",
            e.date.to_string(),
            e.day_label,
            e.infected,
            e.symptomatic
        ));
    }

    out
}

/// Format the tail of the unaccounted-cases series.
pub fn format_unaccounted_table(points: &[DatePoint], tail_rows: usize) -> String {
    let rows = tail(points, tail_rows);
    let mut out = String::new();

    out.push_str(&format!("Unaccounted cases (last {}):\n", rows.len()));
    out.push_str(&format!("{:<12} {:<8} {:>14}\n", "date", "day", "unaccounted"));
    out.push_str(&format!("{:-<12} {:-<8} {:-<14}\n", "", "", ""));

    for p in rows {
        out.push_str(&format!(
            "{:<12} {:<8} {:>14.2}\n",
            p.date.to_string(),
            p.day_label,
            p.value
        ));
    }

    out
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    let start = items.len().saturating_sub(n);
    &items[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{ChartKind, DailySeries, EstimateParams, Scale, day_label};
    use crate::estimate::back_extrapolate;
    use crate::report::unaccounted_cases;

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

    fn daily(y: i32, m: u32, d: u32, positive: i64, death: i64) -> crate::domain::DailyRecord {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        crate::domain::DailyRecord {
            date,
            day_label: day_label(date),
            positive,
            death,
        }
    }

    #[test]
    fn summary_mentions_range_and_params() {
        let series = DailySeries::from_records(vec![
            daily(2020, 3, 15, 100, 10),
            daily(2020, 3, 17, 200, 20),
        ])
        .unwrap();
        let estimates = back_extrapolate(&series, &EstimateParams::default());
        let unaccounted = unaccounted_cases(&estimates, &series);

        let text = format_run_summary(&series, &estimates, &unaccounted, &config());
        assert!(text.contains("dates=[2020-03-15, 2020-03-17]"));
        assert!(text.contains("positive=200 death=20"));
        assert!(text.contains("offset=14d"));
        assert!(text.contains("death_rate=0.0066"));
    }

    #[test]
    fn daily_table_tails_and_aligns() {
        let records: Vec<_> = (10..=20).map(|d| daily(2020, 3, d, d as i64, 1)).collect();
        let text = format_daily_table(&records, 3);

        assert!(text.contains("last 3"));
        assert!(!text.contains("Mar 17"));
        assert!(text.contains("Mar 20"));
    }

    #[test]
    fn estimate_table_shows_two_decimal_estimates() {
        let series = DailySeries::from_records(vec![daily(2020, 3, 17, 100, 10)]).unwrap();
        let estimates = back_extrapolate(&series, &EstimateParams::default());
        let text = format_estimate_table(&estimates, 10);

        assert!(text.contains("Mar 03"));
        assert!(text.contains("1515.15"));
        assert!(text.contains("724.64"));
    }
}
