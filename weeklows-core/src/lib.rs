//! weeklows core: hourly bar sources, ISO-week grouping, extremes ranking,
//! and time-of-day averaging.
//!
//! The crate is a straight pipeline:
//! - [`data`] loads bars from Yahoo Finance, a CSV file, or the bundled sample
//! - [`analysis`] groups bars into ISO weeks, ranks extremes, averages timing
//! - [`report`] renders the result as text or JSON
//! - [`config`] holds the optional TOML settings

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod report;

pub use analysis::{analyze, AnalysisOptions, WeeklyAnalysis};
pub use config::{ConfigError, Settings};
pub use error::AnalysisError;
