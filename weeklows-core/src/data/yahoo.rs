//! Yahoo Finance data provider.
//!
//! Fetches hourly bars from Yahoo's v8 chart API. One request per run, no
//! retries: any failure is handed back to the bar source, which falls back to
//! the bundled sample.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! The CSV import path is the primary fallback when Yahoo is unavailable.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;

use super::provider::{DataError, DataProvider, FetchRequest};
use crate::config::ProviderSettings;
use crate::domain::Bar;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    exchange_timezone_name: Option<String>,
    gmtoffset: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Zone used to turn provider epochs into exchange wall-clock time.
#[derive(Debug, Clone, Copy)]
enum ExchangeZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ExchangeZone {
    fn from_meta(meta: Option<&ChartMeta>) -> Self {
        let named = meta
            .and_then(|m| m.exchange_timezone_name.as_deref())
            .and_then(|name| name.parse::<Tz>().ok());
        if let Some(tz) = named {
            return ExchangeZone::Named(tz);
        }
        match meta.and_then(|m| m.gmtoffset).and_then(FixedOffset::east_opt) {
            Some(offset) => ExchangeZone::Fixed(offset),
            None => ExchangeZone::Named(Tz::UTC),
        }
    }

    fn local(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        match self {
            ExchangeZone::Named(tz) => utc.with_timezone(tz).naive_local(),
            ExchangeZone::Fixed(offset) => utc.with_timezone(offset).naive_local(),
        }
    }
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(settings: &ProviderSettings) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| DataError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the chart API URL for a symbol and epoch range.
    fn chart_url(&self, symbol: &str, start_ts: i64, end_ts: i64) -> String {
        format!(
            "{base}/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1h\
             &includePrePost=false&events=div%2Csplit&includeAdjustedClose=true",
            base = self.base_url
        )
    }

    /// Parse the chart API response into bars in exchange-local time.
    fn parse_response(
        symbol: &str,
        resp: ChartResponse,
        auto_adjust: bool,
    ) -> Result<Vec<Bar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let zone = ExchangeZone::from_meta(data.meta.as_ref());

        // Intraday responses may omit timestamps entirely when there is no data.
        let timestamps = data.timestamp.unwrap_or_default();

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let utc = DateTime::from_timestamp(ts, 0).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;

            let (Some(low), Some(high)) = (
                quote.low.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
            ) else {
                continue;
            };

            let ratio = if auto_adjust {
                adjustment_ratio(
                    quote.close.get(i).copied().flatten(),
                    adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten()),
                )
            } else {
                1.0
            };

            bars.push(Bar::new(zone.local(utc), low * ratio, high * ratio));
        }

        if bars.is_empty() {
            return Err(DataError::EmptyResponse {
                symbol: symbol.to_string(),
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

/// `adjclose / close`, or 1.0 when either side is missing or degenerate.
fn adjustment_ratio(close: Option<f64>, adj_close: Option<f64>) -> f64 {
    match (close, adj_close) {
        (Some(c), Some(a)) if c > 0.0 && a.is_finite() => a / c,
        _ => 1.0,
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbol: &str, request: &FetchRequest) -> Result<Vec<Bar>, DataError> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(request.effective_lookback_days() as i64);
        let url = self.chart_url(symbol, start.timestamp(), end.timestamp());
        debug!(%url, "requesting hourly bars");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let bars = Self::parse_response(symbol, chart, request.auto_adjust)?;
        debug!(symbol, bars = bars.len(), "parsed hourly bars");
        Ok(bars)
    }
}
