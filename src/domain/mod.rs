//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the cleaned daily observations (`DailyRecord`, `DailySeries`)
//! - back-extrapolation inputs/outputs (`EstimateParams`, `EstimateRecord`)
//! - run configuration and chart selection (`RunConfig`, `ChartKind`, `Scale`)
//! - the saved series file schema (`SeriesFile`)

pub mod types;

pub use types::*;
