//! The visible calendar window that occurrences are expanded over.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates::{first_of_month, last_of_month};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CalendarWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether `[first, last]` shares at least one day with the window.
    pub fn overlaps(&self, first: NaiveDate, last: NaiveDate) -> bool {
        first <= self.end && last >= self.start
    }
}

/// How many whole months around the current one to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowConfig {
    pub months_before: u32,
    pub months_after: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            months_before: 2,
            months_after: 3,
        }
    }
}

impl WindowConfig {
    /// Window from the 1st of `months_before` months ago through the last day
    /// of the `months_after`-th following month. Counts that run past the
    /// calendar's range clamp to its first or last representable day.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Months, NaiveDate};
    /// use chore_engine::window::WindowConfig;
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    /// let window = WindowConfig::default().around(today);
    /// assert_eq!(window.start.to_string(), "2026-08-01");
    /// assert_eq!(window.end.to_string(), "2027-01-31");
    /// ```
    pub fn around(&self, today: NaiveDate) -> CalendarWindow {
        let month = first_of_month(today);
        let start = month
            .checked_sub_months(Months::new(self.months_before))
            .unwrap_or(NaiveDate::MIN);
        let end = month
            .checked_add_months(Months::new(self.months_after))
            .map(last_of_month)
            .unwrap_or(NaiveDate::MAX);
        CalendarWindow { start, end }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
