//! ISO calendar week identifier.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// ISO-8601 week: Monday through Sunday, numbered within its ISO year.
///
/// Ordering is chronological because the ISO year sorts before the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekId {
    pub year: i32,
    pub week: u32,
}

impl WeekId {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// Week containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// First day of the week.
    ///
    /// Built from the ISO fields only, so any `WeekId` produced by [`WeekId::of`]
    /// maps back to a real Monday. A hand-built id with week 53 in a 52-week
    /// year rolls into the next year's first Monday.
    pub fn monday(&self) -> NaiveDate {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
            .or_else(|| {
                NaiveDate::from_isoywd_opt(self.year, 1, Weekday::Mon)
                    .map(|week1| week1 + Duration::weeks(self.week.saturating_sub(1) as i64))
            })
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the week.
    pub fn sunday(&self) -> NaiveDate {
        self.monday() + Duration::days(6)
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.monday(), self.sunday())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monday_through_sunday_share_a_week() {
        let week = WeekId::of(date(2024, 3, 25));
        for offset in 0..7 {
            assert_eq!(WeekId::of(date(2024, 3, 25) + Duration::days(offset)), week);
        }
        assert_ne!(WeekId::of(date(2024, 4, 1)), week);
    }

    #[test]
    fn iso_year_differs_from_calendar_year_at_boundary() {
        // 2024-12-30 is a Monday in ISO week 1 of 2025.
        assert_eq!(WeekId::of(date(2024, 12, 30)), WeekId::new(2025, 1));
        // 2021-01-03 is a Sunday in ISO week 53 of 2020.
        assert_eq!(WeekId::of(date(2021, 1, 3)), WeekId::new(2020, 53));
    }

    #[test]
    fn bounds_and_display() {
        let week = WeekId::of(date(2024, 3, 27));
        assert_eq!(week.monday(), date(2024, 3, 25));
        assert_eq!(week.sunday(), date(2024, 3, 31));
        assert_eq!(week.to_string(), "2024-03-25 to 2024-03-31");
    }

    #[test]
    fn ordering_is_chronological_across_years() {
        assert!(WeekId::new(2020, 53) < WeekId::new(2021, 1));
        assert!(WeekId::new(2024, 2) < WeekId::new(2024, 10));
    }
}
