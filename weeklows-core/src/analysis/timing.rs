//! Weekly low/high timing and its average over a window of weeks.
//!
//! Mean time-of-day is the arithmetic mean of whole minutes since midnight
//! (seconds are dropped), rounded to the nearest minute. There is no
//! wrap-around handling: `23:50` and
//! `00:10` average to `12:00`, not midnight. Hourly equity bars never straddle
//! midnight, so the linear mean is the useful one here.

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

use super::extremes::{by_high, by_low};
use super::weeks::WeekGroup;
use crate::domain::{Bar, WeekId};
use crate::error::AnalysisError;

const MINUTES_PER_DAY: u64 = 24 * 60;

/// The single lowest and single highest bar of one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyExtreme {
    pub week: WeekId,
    pub low: Bar,
    pub high: Bar,
}

/// Mean clock time of the weekly lows and highs across a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AveragedTimes {
    pub low: NaiveTime,
    pub high: NaiveTime,
    /// Weeks that contributed.
    pub weeks: usize,
}

/// Lowest-low and highest-high bars of `group`; ties go to the earliest bar.
pub fn weekly_extreme(group: &WeekGroup<'_>) -> Result<WeeklyExtreme, AnalysisError> {
    let empty = || AnalysisError::EmptyWeek {
        week: group.week.to_string(),
    };
    let low = group.bars.iter().min_by(|a, b| by_low(a, b)).ok_or_else(empty)?;
    let high = group.bars.iter().min_by(|a, b| by_high(a, b)).ok_or_else(empty)?;
    Ok(WeeklyExtreme {
        week: group.week,
        low: **low,
        high: **high,
    })
}

/// Mean of `times` on the minute clock, rounded to the nearest minute.
/// `None` for no input.
pub fn mean_time_of_day<I>(times: I) -> Option<NaiveTime>
where
    I: IntoIterator<Item = NaiveTime>,
{
    let (sum, count) = times.into_iter().fold((0u64, 0u64), |(sum, n), t| {
        (sum + u64::from(t.hour() * 60 + t.minute()), n + 1)
    });
    if count == 0 {
        return None;
    }
    // Round half up in integer arithmetic; the sum is exact, so the result
    // does not depend on input order.
    let mean = ((2 * sum + count) / (2 * count)) % MINUTES_PER_DAY;
    NaiveTime::from_hms_opt((mean / 60) as u32, (mean % 60) as u32, 0)
}

/// Extremes for every week in `groups`, and their averaged times.
///
/// The extremes keep the order of `groups`. Empty groups are skipped; zero
/// contributing weeks is `EmptyWindow`.
pub fn average_window(
    groups: &[WeekGroup<'_>],
) -> Result<(Vec<WeeklyExtreme>, AveragedTimes), AnalysisError> {
    let extremes: Vec<WeeklyExtreme> = groups
        .iter()
        .filter(|g| !g.is_empty())
        .map(weekly_extreme)
        .collect::<Result<_, _>>()?;

    let low = mean_time_of_day(extremes.iter().map(|e| e.low.time_of_day()));
    let high = mean_time_of_day(extremes.iter().map(|e| e.high.time_of_day()));

    match (low, high) {
        (Some(low), Some(high)) => {
            let averages = AveragedTimes {
                low,
                high,
                weeks: extremes.len(),
            };
            Ok((extremes, averages))
        }
        _ => Err(AnalysisError::EmptyWindow),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::weeks::group_by_week;
    use chrono::NaiveDateTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn bar(ts: &str, low: f64, high: f64) -> Bar {
        Bar::new(
            NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M").unwrap(),
            low,
            high,
        )
    }

    #[test]
    fn mean_of_single_time_is_itself() {
        assert_eq!(mean_time_of_day([t(10, 30)]), Some(t(10, 30)));
    }

    #[test]
    fn mean_is_linear_not_circular() {
        // Near-midnight times average to noon under seconds-since-midnight.
        assert_eq!(mean_time_of_day([t(23, 50), t(0, 10)]), Some(t(12, 0)));
    }

    #[test]
    fn mean_rounds_to_nearest_minute() {
        // (570 * 6 + 630) / 7 = 578.57 minutes.
        let times = [t(9, 30), t(9, 30), t(9, 30), t(9, 30), t(9, 30), t(9, 30), t(10, 30)];
        let mean = mean_time_of_day(times).unwrap();
        assert_eq!(mean, t(9, 39));
        assert_eq!(crate::report::clock(mean), "09:39");
        assert_eq!(mean_time_of_day([t(9, 30), t(10, 30), t(15, 30)]), Some(t(11, 50)));
    }

    #[test]
    fn mean_rounds_half_minute_up() {
        assert_eq!(mean_time_of_day([t(9, 30), t(9, 31)]), Some(t(9, 31)));
    }

    #[test]
    fn mean_ignores_seconds() {
        let odd = NaiveTime::from_hms_opt(10, 30, 59).unwrap();
        assert_eq!(mean_time_of_day([odd]), Some(t(10, 30)));
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean_time_of_day(Vec::new()), None);
    }

    #[test]
    fn weekly_extreme_prefers_earliest_on_ties() {
        let bars = vec![
            bar("2024-03-26 14:30", 5.0, 9.0),
            bar("2024-03-25 09:30", 5.0, 9.0),
        ];
        let groups = group_by_week(&bars);
        let ext = weekly_extreme(&groups[0]).unwrap();
        assert_eq!(ext.low.timestamp, bars[1].timestamp);
        assert_eq!(ext.high.timestamp, bars[1].timestamp);
    }

    #[test]
    fn window_averages_each_weeks_extreme() {
        let bars = vec![
            bar("2024-03-18 09:30", 5.0, 8.0),
            bar("2024-03-19 15:30", 6.0, 9.0),
            bar("2024-03-25 11:30", 4.0, 7.0),
            bar("2024-03-26 13:30", 4.5, 10.0),
        ];
        let groups = group_by_week(&bars);
        let (extremes, avg) = average_window(&groups).unwrap();
        assert_eq!(extremes.len(), 2);
        assert_eq!(avg.weeks, 2);
        // Lows at 09:30 and 11:30, highs at 15:30 and 13:30.
        assert_eq!(avg.low, t(10, 30));
        assert_eq!(avg.high, t(14, 30));
    }

    #[test]
    fn empty_window_is_an_error() {
        assert!(matches!(average_window(&[]), Err(AnalysisError::EmptyWindow)));
    }
}
