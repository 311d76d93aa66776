//! CSV import for offline runs.
//!
//! Expected header: `timestamp,low,high` (extra columns are ignored and the
//! order is free). Timestamps are ISO-8601; an explicit UTC offset is accepted
//! but only its wall-clock component is kept.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::domain::Bar;
use crate::error::AnalysisError;

const REQUIRED_COLUMNS: [&str; 3] = ["timestamp", "low", "high"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parse an ISO-8601 timestamp into naive wall-clock time.
///
/// Accepts naive datetimes (`T` or space separator, optional seconds and
/// fraction), RFC 3339 with an offset, and a bare date (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();

    for fmt in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(s, fmt) {
            return Some(ts.naive_local());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Read bars from any CSV source. Rows keep file order.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, AnalysisError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| AnalysisError::MalformedInput(format!("unreadable header: {e}")))?
        .clone();

    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (ts_idx, low_idx, high_idx) = match (column("timestamp"), column("low"), column("high")) {
        (Some(t), Some(l), Some(h)) => (t, l, h),
        _ => {
            let missing: Vec<&str> = REQUIRED_COLUMNS
                .iter()
                .copied()
                .filter(|name| column(*name).is_none())
                .collect();
            return Err(AnalysisError::MalformedInput(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }
    };

    let mut bars = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let record = record
            .map_err(|e| AnalysisError::MalformedInput(format!("line {line}: {e}")))?;

        let raw_ts = field(&record, ts_idx, "timestamp", line)?;
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| {
            AnalysisError::MalformedInput(format!("line {line}: invalid timestamp '{raw_ts}'"))
        })?;
        let low = parse_price(field(&record, low_idx, "low", line)?, "low", line)?;
        let high = parse_price(field(&record, high_idx, "high", line)?, "high", line)?;

        bars.push(Bar::new(timestamp, low, high));
    }

    let insane = bars.iter().filter(|b| !b.is_sane()).count();
    if insane > 0 {
        warn!(insane, "bars with negative low or high below low");
    }
    debug!(bars = bars.len(), "parsed CSV bars");
    Ok(bars)
}

/// Load bars from a CSV file on disk.
pub fn load_csv(path: &Path) -> Result<Vec<Bar>, AnalysisError> {
    let file = File::open(path).map_err(|e| {
        AnalysisError::MalformedInput(format!("cannot open {}: {e}", path.display()))
    })?;
    read_bars(file)
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<&'r str, AnalysisError> {
    record.get(idx).ok_or_else(|| {
        AnalysisError::MalformedInput(format!("line {line}: missing value for '{name}'"))
    })
}

fn parse_price(raw: &str, name: &str, line: usize) -> Result<f64, AnalysisError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AnalysisError::MalformedInput(format!(
            "line {line}: invalid {name} value '{raw}'"
        ))),
    }
}
