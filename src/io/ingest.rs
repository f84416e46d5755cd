//! Feed cleaning and normalization.
//!
//! This module turns raw feed maps into a `DailySeries` that is safe to
//! analyze. The field policy is explicit rather than a blanket fill:
//!
//! - `date` is **required**: an 8-digit `YYYYMMDD` numeral (string or number)
//! - `positive` and `death` are the only **zero-defaultable** fields
//!   (null/absent becomes 0)
//! - `hash` and `dateChecked` are provenance metadata and are dropped
//! - any other inbound field is ignored, never dynamically accessible
//!
//! Design goals:
//! - **Strict schema** for required fields (clear errors + distinct exit codes)
//! - **Fail loudly**: bad dates, negative or non-numeric counts, and duplicate
//!   dates abort the run; the NA→0 rule is the only silent default
//! - **Pure transform**: input is untouched, output is a new collection

use chrono::NaiveDate;
use serde_json::Value;

use crate::data::RawRecord;
use crate::domain::{DailyRecord, DailySeries, day_label};
use crate::error::{AppError, ErrorKind};

/// Clean raw feed records into a sorted `DailySeries`.
pub fn clean_records(raw: &[RawRecord]) -> Result<DailySeries, AppError> {
    let mut records = Vec::with_capacity(raw.len());
    for (idx, record) in raw.iter().enumerate() {
        let date = parse_report_date(record, idx)?;
        let positive = count_or_zero(record, "positive", idx)?;
        let death = count_or_zero(record, "death", idx)?;
        records.push(DailyRecord {
            date,
            day_label: day_label(date),
            positive,
            death,
        });
    }
    DailySeries::from_records(records)
}

/// Parse the required `date` field.
///
/// The feed serves the date as an 8-digit numeral, sometimes as a JSON number
/// and sometimes as a string; both are accepted. Anything that is not exactly
/// 8 ASCII digits forming a real calendar date is a date-format error.
fn parse_report_date(record: &RawRecord, idx: usize) -> Result<NaiveDate, AppError> {
    let raw = match record.get("date") {
        None | Some(Value::Null) => {
            return Err(AppError::new(
                ErrorKind::Schema,
                format!("Record {idx}: missing required field `date`."),
            ));
        }
        Some(value) => value,
    };

    let digits = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(AppError::new(
                ErrorKind::DateFormat,
                format!(
                    "Record {idx}: `date` is not an 8-digit numeral (found {other})."
                ),
            ));
        }
    };

    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::new(
            ErrorKind::DateFormat,
            format!("Record {idx}: `date` value '{digits}' does not match YYYYMMDD."),
        ));
    }

    NaiveDate::parse_from_str(&digits, "%Y%m%d").map_err(|e| {
        AppError::new(
            ErrorKind::DateFormat,
            format!("Record {idx}: `date` value '{digits}' is not a calendar date: {e}"),
        )
    })
}

/// Extract a zero-defaultable count field.
///
/// Null/absent is the documented NA→0 rule. A present value must be a
/// non-negative integer; anything else is a schema error rather than another
/// silent default.
fn count_or_zero(record: &RawRecord, field: &str, idx: usize) -> Result<i64, AppError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => {
            let value = n.as_i64().ok_or_else(|| {
                AppError::new(
                    ErrorKind::Schema,
                    format!("Record {idx}: `{field}` value {n} is not an integer count."),
                )
            })?;
            if value < 0 {
                return Err(AppError::new(
                    ErrorKind::Schema,
                    format!("Record {idx}: `{field}` count is negative ({value})."),
                ));
            }
            Ok(value)
        }
        Some(other) => Err(AppError::new(
            ErrorKind::Schema,
            format!("Record {idx}: `{field}` is not numeric (found {other})."),
        )),
    }
}
