//! Calendar-date helpers shared by the recurrence engine and the task model.
//!
//! Everything here works on [`NaiveDate`]: a task's dates are local calendar
//! days, never instants, so nothing in this crate converts between zones.

use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::error::{ChoreError, Result};

/// Weekdays in index order (Monday = 0 .. Sunday = 6).
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Short weekday labels, indexed like [`WEEKDAYS`].
pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Full weekday names, indexed like [`WEEKDAYS`].
pub const WEEKDAY_FULL: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// ── Parsing and formatting ──────────────────────────────────────────────────

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, or an ISO 8601 datetime whose leading date part is
/// taken as written (`2026-03-15T23:30:00-08:00` is March 15). The offset is
/// ignored: the stored date is the calendar day the user picked.
///
/// # Errors
///
/// Returns [`ChoreError::InvalidDate`] if no valid date can be read.
///
/// # Examples
///
/// ```
/// use chore_engine::dates::parse_date;
///
/// let date = parse_date("2026-03-15T23:30:00-08:00").unwrap();
/// assert_eq!(date.to_string(), "2026-03-15");
/// ```
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    let date_part = s.split(['T', ' ']).next().unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| ChoreError::InvalidDate(format!("'{s}': {e}")))
}

/// Format a date as the `YYYY-MM-DD` key used for completion tracking.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ── Weekdays ────────────────────────────────────────────────────────────────

/// Map a Monday-based index (0..=6) to a weekday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    WEEKDAYS.get(index as usize).copied()
}

/// Monday-based index (0..=6) of a weekday.
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_monday() as u8
}

/// Parse a weekday name: full, three-letter, or two-letter RRULE code.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" | "mo" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" | "tu" => Some(Weekday::Tue),
        "wednesday" | "wed" | "we" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" | "th" => Some(Weekday::Thu),
        "friday" | "fri" | "fr" => Some(Weekday::Fri),
        "saturday" | "sat" | "sa" => Some(Weekday::Sat),
        "sunday" | "sun" | "su" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Full English name of a weekday.
pub fn weekday_full_name(weekday: Weekday) -> &'static str {
    WEEKDAY_FULL[weekday_index(weekday) as usize]
}

/// Which occurrence of its weekday a date is within its month (1..=5).
///
/// Days 1-7 are the 1st, 8-14 the 2nd, and so on: `ceil(day / 7)`.
pub fn nth_weekday_of_month(date: NaiveDate) -> u32 {
    date.day().div_ceil(7)
}

// ── Months ──────────────────────────────────────────────────────────────────

/// First day of the date's month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the date's month.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Shift a date by a signed number of whole months, clamping the day to the
/// target month's length (Jan 31 + 1 month = Feb 28/29).
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

/// Number of calendar months from `from`'s month to `to`'s month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + (to.month() as i64 - from.month() as i64)
}

// ── Tests ───────────────────────────────────────────────────────────────────
