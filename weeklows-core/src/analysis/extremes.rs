//! Top-N lows and highs within one week.

use std::cmp::Ordering;

use serde::Serialize;

use super::weeks::WeekGroup;
use crate::domain::{Bar, WeekId};
use crate::error::AnalysisError;

/// Bars ranked per side for one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremesReport {
    pub week: WeekId,
    /// Ascending by low.
    pub lows: Vec<Bar>,
    /// Descending by high.
    pub highs: Vec<Bar>,
}

/// Lower low first; equal lows go to the earlier timestamp.
pub(crate) fn by_low(a: &Bar, b: &Bar) -> Ordering {
    a.low
        .total_cmp(&b.low)
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

/// Higher high first; equal highs go to the earlier timestamp.
pub(crate) fn by_high(a: &Bar, b: &Bar) -> Ordering {
    b.high
        .total_cmp(&a.high)
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

/// Rank the `count` lowest lows and highest highs of `group`.
///
/// Sorting is stable, so bars that tie on both value and timestamp keep
/// their input order. A group smaller than `count` returns every bar on each
/// side with no padding.
pub fn rank_extremes(group: &WeekGroup<'_>, count: usize) -> Result<ExtremesReport, AnalysisError> {
    if group.is_empty() {
        return Err(AnalysisError::EmptyWeek {
            week: group.week.to_string(),
        });
    }

    let mut lows: Vec<Bar> = group.bars.iter().map(|b| **b).collect();
    lows.sort_by(by_low);
    lows.truncate(count);

    let mut highs: Vec<Bar> = group.bars.iter().map(|b| **b).collect();
    highs.sort_by(by_high);
    highs.truncate(count);

    Ok(ExtremesReport {
        week: group.week,
        lows,
        highs,
    })
}
