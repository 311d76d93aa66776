//! Bar resolution: live download with sample fallback, or a CSV file.
//!
//! Fallback policy for the live path:
//! 1. Ask the provider once
//! 2. On any provider error or an empty result → bundled sample, with the
//!    reason recorded so the caller can print a notice
//!
//! The file path never falls back: a bad file is the user's input error.
//! Either path producing zero bars is `NoData`.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::provider::{DataProvider, DataSource, FetchRequest};
use super::sample::load_sample;
use super::csv_import::load_csv;
use crate::domain::Bar;
use crate::error::AnalysisError;

/// Where to get bars from.
#[derive(Debug, Clone)]
pub enum SourceSpec {
    /// Live fetch through a [`DataProvider`].
    Live(FetchRequest),
    /// Local CSV file with `timestamp,low,high` columns.
    File(PathBuf),
}

/// Bars plus their provenance.
#[derive(Debug, Clone)]
pub struct LoadedBars {
    pub bars: Vec<Bar>,
    pub source: DataSource,
    /// Why the live fetch was abandoned, when the sample stood in for it.
    pub fallback: Option<String>,
}

impl LoadedBars {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Stderr notice for a fallback run, `None` otherwise.
    pub fn fallback_notice(&self, symbol: &str) -> Option<String> {
        self.fallback.as_ref().map(|reason| {
            format!("notice: live download for {symbol} failed ({reason}); using bundled sample data")
        })
    }
}

/// Load bars for `symbol` according to `origin`.
///
/// `provider` may be `None` for offline use; a live request then goes straight
/// to the sample. `sample_path` replaces the bundled sample when set.
pub fn load_bars(
    symbol: &str,
    origin: &SourceSpec,
    provider: Option<&dyn DataProvider>,
    sample_path: Option<&Path>,
) -> Result<LoadedBars, AnalysisError> {
    let loaded = match origin {
        SourceSpec::File(path) => {
            debug!(path = %path.display(), "loading bars from CSV");
            LoadedBars {
                bars: load_csv(path)?,
                source: DataSource::CsvFile,
                fallback: None,
            }
        }
        SourceSpec::Live(request) => {
            let outcome = match provider {
                Some(p) => {
                    debug!(provider = p.name(), symbol, "fetching live bars");
                    p.fetch(symbol, request).map_err(|e| e.to_string())
                }
                None => Err("no live provider configured".to_string()),
            };

            match outcome {
                Ok(bars) if !bars.is_empty() => LoadedBars {
                    bars,
                    source: DataSource::YahooFinance,
                    fallback: None,
                },
                Ok(_) => fallback(symbol, "provider returned no bars".into(), sample_path)?,
                Err(reason) => fallback(symbol, reason, sample_path)?,
            }
        }
    };

    if loaded.bars.is_empty() {
        return Err(AnalysisError::NoData(format!(
            "{} produced zero bars for {symbol}",
            loaded.source.label()
        )));
    }

    debug!(
        symbol,
        bars = loaded.bars.len(),
        source = loaded.source.label(),
        "bars loaded"
    );
    Ok(loaded)
}

fn fallback(
    symbol: &str,
    reason: String,
    sample_path: Option<&Path>,
) -> Result<LoadedBars, AnalysisError> {
    warn!(symbol, %reason, "live download failed, using sample data");
    Ok(LoadedBars {
        bars: load_sample(sample_path)?,
        source: DataSource::BundledSample,
        fallback: Some(reason),
    })
}
