//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over the live source so the fallback path
//! can be exercised with a stub in tests.

use thiserror::Error;

use crate::domain::Bar;

/// Hourly history the provider serves at most.
pub const MAX_HOURLY_LOOKBACK_DAYS: u32 = 730;

/// Structured error types for a live fetch.
///
/// Every variant is recoverable: the bar source logs it and falls back to the
/// bundled sample instead of failing the run.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {symbol}")]
    HttpStatus { status: u16, symbol: String },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("provider returned no bars for {symbol}")]
    EmptyResponse { symbol: String },

    #[error("could not build HTTP client: {0}")]
    Client(String),
}

/// Parameters for one live fetch of hourly bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Calendar days of history ending now.
    pub lookback_days: u32,
    /// Scale low/high by the adjusted-close ratio when the provider supplies one.
    pub auto_adjust: bool,
}

impl FetchRequest {
    pub fn hourly(lookback_days: u32, auto_adjust: bool) -> Self {
        Self {
            lookback_days,
            auto_adjust,
        }
    }

    /// Lookback clamped to what the provider serves for hourly bars.
    pub fn effective_lookback_days(&self) -> u32 {
        self.lookback_days.clamp(1, MAX_HOURLY_LOOKBACK_DAYS)
    }
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self::hourly(60, true)
    }
}

/// Where the bars came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    YahooFinance,
    CsvFile,
    BundledSample,
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::YahooFinance => "yahoo_finance",
            DataSource::CsvFile => "csv_file",
            DataSource::BundledSample => "bundled_sample",
        }
    }
}

/// Trait for live bar providers.
///
/// A single call is a single attempt: implementations must not retry.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch hourly bars for `symbol`, sorted by timestamp.
    fn fetch(&self, symbol: &str, request: &FetchRequest) -> Result<Vec<Bar>, DataError>;
}
