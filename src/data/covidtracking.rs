//! covidtracking.com US daily feed integration.
//!
//! The feed is a single JSON array of per-day objects. We keep each element
//! as an untyped field map here and leave all normalization (date parsing,
//! zero-fills, sorting) to `io::ingest`, so schema decisions live in one
//! place.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{AppError, ErrorKind};

const BASE_URL: &str = "https://covidtracking.com/api/us/daily";

/// One raw feed element: a field-name → value map, untouched.
pub type RawRecord = serde_json::Map<String, Value>;

pub struct CovidClient {
    client: Client,
    url: String,
}

impl CovidClient {
    /// Build a client from the environment.
    ///
    /// `COVID_TRACKING_URL` (from the environment or a `.env` file) overrides
    /// the built-in endpoint; an explicit URL passed by the caller overrides
    /// both.
    pub fn from_env(url_override: Option<&str>) -> Self {
        dotenvy::dotenv().ok();
        let url = url_override
            .map(str::to_string)
            .or_else(|| std::env::var("COVID_TRACKING_URL").ok())
            .unwrap_or_else(|| BASE_URL.to_string());
        Self {
            client: Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One blocking GET, no retry: this is a one-shot analysis run, not a
    /// service.
    pub fn fetch_daily(&self) -> Result<Vec<RawRecord>, AppError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::new(ErrorKind::Fetch, format!("Feed request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                ErrorKind::Fetch,
                format!("Feed request failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::new(ErrorKind::Fetch, format!("Failed to read feed body: {e}")))?;

        parse_records(&body)
    }
}

/// Parse a feed body into raw records.
///
/// The endpoint contract is a JSON array of homogeneous objects; anything
/// else is a parse error.
pub fn parse_records(body: &str) -> Result<Vec<RawRecord>, AppError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::new(ErrorKind::Parse, format!("Feed is not valid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(AppError::new(
            ErrorKind::Parse,
            "Feed is not a JSON array of daily records.",
        ));
    };

    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => out.push(map),
            other => {
                return Err(AppError::new(
                    ErrorKind::Parse,
                    format!(
                        "Feed element {idx} is not an object (found {}).",
                        json_type_name(&other)
                    ),
                ));
            }
        }
    }

    Ok(out)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
