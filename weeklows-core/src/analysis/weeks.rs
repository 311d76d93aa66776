//! ISO-week grouping.
//!
//! Groups are views: they borrow bars from the caller's slice and keep input
//! order within a week.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Weekday};

use crate::domain::{Bar, WeekId};

/// Bars falling in one ISO calendar week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekGroup<'a> {
    pub week: WeekId,
    pub bars: Vec<&'a Bar>,
}

impl<'a> WeekGroup<'a> {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}

/// ISO week containing `date`.
pub fn week_of(date: NaiveDate) -> WeekId {
    WeekId::of(date)
}

/// Bars of `week`, in input order. Empty when the week holds no data.
pub fn select_week(bars: &[Bar], week: WeekId) -> WeekGroup<'_> {
    WeekGroup {
        week,
        bars: bars.iter().filter(|b| b.week() == week).collect(),
    }
}

/// Partition `bars` into one group per week present, oldest week first.
pub fn group_by_week(bars: &[Bar]) -> Vec<WeekGroup<'_>> {
    let mut weeks: BTreeMap<WeekId, Vec<&Bar>> = BTreeMap::new();
    for bar in bars {
        weeks.entry(bar.week()).or_default().push(bar);
    }
    weeks
        .into_iter()
        .map(|(week, bars)| WeekGroup { week, bars })
        .collect()
}

/// The `n` most recent weeks present in the data, most recent first.
///
/// With `anchor`, weeks after it are ignored. Fewer than `n` weeks is not an
/// error: every available week is returned.
pub fn recent_weeks(bars: &[Bar], anchor: Option<WeekId>, n: usize) -> Vec<WeekGroup<'_>> {
    group_by_week(bars)
        .into_iter()
        .rev()
        .filter(|g| anchor.map_or(true, |a| g.week <= a))
        .take(n)
        .collect()
}

/// Most recent complete week in the data, judged on `today`.
///
/// The latest week counts as complete once it holds a bar on Friday or later,
/// or once `today` is past that week's Friday, which covers a session week cut
/// short by a Friday holiday. Otherwise the latest earlier week present is
/// used, and if there is none the latest week is returned anyway.
pub fn default_target_week(bars: &[Bar], today: NaiveDate) -> Option<WeekId> {
    let latest = bars.iter().map(|b| b.week()).max()?;
    let friday =
        latest.monday() + Duration::days(i64::from(Weekday::Fri.num_days_from_monday()));
    let reached_friday = bars
        .iter()
        .any(|b| b.week() == latest && b.timestamp.date() >= friday);
    if reached_friday || today > friday {
        return Some(latest);
    }
    let previous = bars.iter().map(|b| b.week()).filter(|w| *w < latest).max();
    Some(previous.unwrap_or(latest))
}
