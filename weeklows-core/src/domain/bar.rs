//! Bar: one hourly price observation.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::week::WeekId;

/// Hourly low/high bar for a single symbol.
///
/// `timestamp` is exchange-local wall-clock time with no zone attached. Live
/// bars are normalized into the exchange's zone at fetch time; CSV bars keep
/// whatever wall clock the file carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub low: f64,
    pub high: f64,
}

impl Bar {
    pub fn new(timestamp: NaiveDateTime, low: f64, high: f64) -> Self {
        Self {
            timestamp,
            low,
            high,
        }
    }

    /// Clock component of the timestamp.
    pub fn time_of_day(&self) -> NaiveTime {
        self.timestamp.time()
    }

    /// ISO calendar week this bar belongs to.
    pub fn week(&self) -> WeekId {
        WeekId::of(self.timestamp.date())
    }

    /// Full weekday name, e.g. "Monday".
    pub fn day_name(&self) -> String {
        self.timestamp.format("%A").to_string()
    }

    /// Returns true if low or high is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !self.low.is_finite() || !self.high.is_finite()
    }

    /// Basic sanity check: finite, non-negative low, high >= low.
    ///
    /// Not enforced at load time; surfaced as a log warning only.
    pub fn is_sane(&self) -> bool {
        !self.is_void() && self.low >= 0.0 && self.high >= self.low
    }
}
