//! Weekly extremes analysis: group → rank → average.
//!
//! [`analyze`] computes everything up front and returns a single value, so a
//! failure never leaves a half-printed report behind.

pub mod extremes;
pub mod timing;
pub mod weeks;

pub use extremes::{rank_extremes, ExtremesReport};
pub use timing::{average_window, mean_time_of_day, weekly_extreme, AveragedTimes, WeeklyExtreme};
pub use weeks::{default_target_week, group_by_week, recent_weeks, select_week, week_of, WeekGroup};

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::domain::{Bar, WeekId};
use crate::error::AnalysisError;

/// Bars listed per side in the extremes report.
pub const DEFAULT_TOP: usize = 3;

/// Trailing weeks averaged when nothing else is configured.
pub const DEFAULT_WINDOW: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Any date inside the target week; `None` picks the most recent complete week.
    pub target: Option<NaiveDate>,
    /// Trailing weeks to average, target week included. Must be at least 1.
    pub window: usize,
    /// Bars per side in the extremes report. Must be at least 1.
    pub top: usize,
    /// Date the default target week is judged on; `None` uses today's local date.
    pub as_of: Option<NaiveDate>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            target: None,
            window: DEFAULT_WINDOW,
            top: DEFAULT_TOP,
            as_of: None,
        }
    }
}

/// Everything the report needs, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAnalysis {
    pub symbol: String,
    pub week: WeekId,
    pub extremes: ExtremesReport,
    /// Per-week extremes, most recent first.
    pub window: Vec<WeeklyExtreme>,
    pub requested_window: usize,
    pub averages: AveragedTimes,
}

impl WeeklyAnalysis {
    /// True when fewer weeks had data than were requested.
    pub fn is_partial_window(&self) -> bool {
        self.window.len() < self.requested_window
    }
}

/// Run the full analysis over `bars` (any order).
pub fn analyze(
    symbol: &str,
    bars: &[Bar],
    opts: &AnalysisOptions,
) -> Result<WeeklyAnalysis, AnalysisError> {
    if opts.window == 0 {
        return Err(AnalysisError::InvalidArgument(
            "window must be at least 1".into(),
        ));
    }
    if opts.top == 0 {
        return Err(AnalysisError::InvalidArgument(
            "top count must be at least 1".into(),
        ));
    }

    let week = match opts.target {
        Some(date) => week_of(date),
        None => {
            let today = opts.as_of.unwrap_or_else(|| Local::now().date_naive());
            default_target_week(bars, today).ok_or_else(|| {
                AnalysisError::NoData(format!("no bars to analyze for {symbol}"))
            })?
        }
    };
    debug!(%week, "target week selected");

    let extremes = rank_extremes(&select_week(bars, week), opts.top)?;

    let groups = recent_weeks(bars, Some(week), opts.window);
    debug!(
        requested = opts.window,
        available = groups.len(),
        "averaging window"
    );
    let (window, averages) = average_window(&groups)?;

    Ok(WeeklyAnalysis {
        symbol: symbol.to_string(),
        week,
        extremes,
        window,
        requested_window: opts.window,
        averages,
    })
}
