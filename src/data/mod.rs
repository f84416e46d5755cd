//! Remote data sources.

pub mod covidtracking;

pub use covidtracking::{CovidClient, RawRecord, parse_records};
