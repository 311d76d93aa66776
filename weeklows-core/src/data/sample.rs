//! Bundled sample data used when the live download is unavailable.
//!
//! Thirteen weeks of hourly bars (2024-01-08 through 2024-04-05, 09:30 to
//! 15:30 exchange time) compiled into the binary so the fallback never
//! depends on the working directory.

use std::path::Path;

use crate::domain::Bar;
use crate::error::AnalysisError;

use super::csv_import::{load_csv, read_bars};

pub const SAMPLE_CSV: &str = include_str!("../../data/sample_hourly.csv");

/// Load the sample: from `override_path` when configured, else the bundled copy.
pub fn load_sample(override_path: Option<&Path>) -> Result<Vec<Bar>, AnalysisError> {
    match override_path {
        Some(path) => load_csv(path),
        None => read_bars(SAMPLE_CSV.as_bytes()),
    }
}
