//! Occurrence Expander: rule string + anchor + window → concrete dates.
//!
//! Expansion is delegated to the `rrule` crate. The engine supplies the
//! anchor as `DTSTART` on every call (overriding anything embedded in the
//! stored string) and clips the result to the requested window.
//!
//! # Dates, not instants
//!
//! Occurrences are calendar dates. They are carried through `rrule` as UTC
//! midnights purely because it needs a zoned type, then read back with
//! `date_naive()` in the same zone. No conversion between zones happens at any
//! point, so an occurrence can never slide onto the neighbouring day.
//!
//! # Windowing
//!
//! A task anchored years before the visible window should not cost years of
//! iteration. For the shapes the builder produces (DAILY, WEEKLY or MONTHLY
//! made only of modelled parts, without `COUNT`) the start point is moved
//! forward by whole periods to the last period boundary at or before the window
//! start. Other rules are expanded from the anchor with the window as
//! iteration bounds.

use chrono::{Datelike, DateTime, Duration, NaiveDate, TimeZone};
use rrule::{RRuleSet, Tz};

use crate::dates::{first_of_month, months_between, shift_months};
use crate::rule::{RecurrenceRule, RuleFrequency};

/// Upper bound on dates pulled from `rrule` for one window.
const MAX_OCCURRENCES: u16 = u16::MAX;

/// Expand `rule` into the dates it falls on within `[range_start, range_end]`.
///
/// Returns an ascending, deduplicated list of dates that are on or after
/// `anchor` and inside the window (both ends inclusive). A malformed rule
/// yields an empty list and a warning log; this function never fails.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chore_engine::expander::expand;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let dates = expand("FREQ=DAILY;INTERVAL=3", d(1), d(1), d(10));
/// assert_eq!(dates, vec![d(1), d(4), d(7), d(10)]);
/// ```
pub fn expand(
    rule: &str,
    anchor: NaiveDate,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<NaiveDate> {
    let window_start = range_start.max(anchor);
    if window_start > range_end {
        return Vec::new();
    }

    let (dt_start, body) = match rule.parse::<RecurrenceRule>() {
        Ok(parsed) => {
            if parsed.until.is_some_and(|until| until < window_start) {
                return Vec::new();
            }
            match fast_forward(&parsed, anchor, window_start) {
                Some((start, shifted)) => {
                    log::debug!("fast-forwarded '{parsed}' from {anchor} to {start}");
                    (start, shifted.to_string())
                }
                None => (anchor, parsed.to_string()),
            }
        }
        Err(err) => {
            log::warn!("cannot expand malformed rule {rule:?}: {err}");
            return Vec::new();
        }
    };

    expand_with_rrule(&body, dt_start, anchor, window_start, range_end).unwrap_or_default()
}

/// Expand an already parsed rule.
pub fn expand_rule(
    rule: &RecurrenceRule,
    anchor: NaiveDate,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<NaiveDate> {
    expand(&rule.to_string(), anchor, range_start, range_end)
}

/// Run `rrule` and clip to `[window_start, range_end]`. `None` if `rrule`
/// rejects the rule.
fn expand_with_rrule(
    body: &str,
    dt_start: NaiveDate,
    anchor: NaiveDate,
    window_start: NaiveDate,
    range_end: NaiveDate,
) -> Option<Vec<NaiveDate>> {
    let source = format!("DTSTART:{}T000000Z\nRRULE:{}", dt_start.format("%Y%m%d"), body);
    let set: RRuleSet = match source.parse() {
        Ok(set) => set,
        Err(err) => {
            log::warn!("rrule rejected {body:?}: {err}");
            return None;
        }
    };

    // Bounds are widened by a day and the exact window is applied below, so
    // this does not depend on whether rrule treats them as inclusive.
    let after = utc_midnight(window_start.pred_opt().unwrap_or(window_start))?;
    let before = utc_midnight(range_end.succ_opt().unwrap_or(range_end))?;
    let result = set.after(after).before(before).all(MAX_OCCURRENCES);
    if result.limited {
        log::warn!(
            "expansion of {body:?} stopped at {MAX_OCCURRENCES} dates; \
             window {window_start}..={range_end} is truncated"
        );
    }

    let mut dates: Vec<NaiveDate> = result
        .dates
        .iter()
        .map(|dt| dt.date_naive())
        .filter(|d| *d >= anchor && *d >= window_start && *d <= range_end)
        .collect();
    dates.sort();
    dates.dedup();
    Some(dates)
}

/// A later start point aligned to the rule's period, plus the rule rewritten
/// so that nothing implied by the original anchor is lost.
///
/// Returns `None` when the rule cannot be shifted safely or no whole period
/// separates the anchor from the window.
fn fast_forward(
    rule: &RecurrenceRule,
    anchor: NaiveDate,
    window_start: NaiveDate,
) -> Option<(NaiveDate, RecurrenceRule)> {
    if rule.count.is_some() || !rule.is_fully_modelled() {
        return None;
    }
    let interval = rule.interval.max(1) as i64;

    match rule.frequency {
        RuleFrequency::Daily | RuleFrequency::Weekly => {
            let period_days = if rule.frequency == RuleFrequency::Weekly {
                7 * interval
            } else {
                interval
            };
            let periods = (window_start - anchor).num_days() / period_days;
            if periods < 1 {
                return None;
            }
            let start = anchor + Duration::days(periods * period_days);
            Some((start, rule.clone()))
        }
        RuleFrequency::Monthly => {
            let periods = months_between(anchor, window_start) / interval;
            if periods < 1 {
                return None;
            }
            let months = i32::try_from(periods * interval).ok()?;
            // Start on the 1st so every day of the landing month is reachable.
            let start = shift_months(first_of_month(anchor), months)?;
            let mut shifted = rule.clone();
            if shifted.by_day.is_empty() && shifted.by_month_day.is_empty() {
                shifted.by_month_day = vec![anchor.day() as i8];
            }
            Some((start, shifted))
        }
        _ => None,
    }
}

fn utc_midnight(date: NaiveDate) -> Option<DateTime<Tz>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    Some(Tz::UTC.from_utc_datetime(&naive))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── shapes produced by the builder ──────────────────────────────────

    #[test]
    fn test_daily_every_third_day() {
        let dates = expand(
            "FREQ=DAILY;INTERVAL=3",
            date(2024, 1, 1),
            date(2024, 1, 1),
            date(2024, 1, 10),
        );
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 4), date(2024, 1, 7), date(2024, 1, 10)]
        );
    }

    #[test]
    fn test_weekly_monday_wednesday_two_weeks() {
        // Jan 1 2024 is a Monday
        let dates = expand(
            "FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,WE",
            date(2024, 1, 1),
            date(2024, 1, 1),
            date(2024, 1, 14),
        );
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 8), date(2024, 1, 10)]
        );
    }

    #[test]
    fn test_weekly_implicit_anchor_weekday() {
        // Jan 3 2024 is a Wednesday
        let dates = expand(
            "FREQ=WEEKLY;INTERVAL=1",
            date(2024, 1, 3),
            date(2024, 1, 1),
            date(2024, 1, 24),
        );
        assert_eq!(
            dates,
            vec![date(2024, 1, 3), date(2024, 1, 10), date(2024, 1, 17), date(2024, 1, 24)]
        );
    }

    #[test]
    fn test_weekly_until_stops_after_end_date() {
        let dates = expand(
            "FREQ=WEEKLY;INTERVAL=1;UNTIL=20240108T235959Z",
            date(2024, 1, 1),
            date(2024, 1, 1),
            date(2024, 12, 31),
        );
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 8)]);
    }

    #[test]
    fn test_monthly_second_wednesday() {
        let dates = expand(
            "FREQ=MONTHLY;INTERVAL=1;BYDAY=2WE",
            date(2024, 1, 10),
            date(2024, 1, 1),
            date(2024, 3, 31),
        );
        assert_eq!(dates, vec![date(2024, 1, 10), date(2024, 2, 14), date(2024, 3, 13)]);
    }

    #[test]
    fn test_monthly_day_of_month_skips_short_months() {
        let dates = expand(
            "FREQ=MONTHLY;INTERVAL=1",
            date(2024, 1, 31),
            date(2024, 1, 1),
            date(2024, 5, 31),
        );
        assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 3, 31), date(2024, 5, 31)]);
    }

    // ── window and anchor bounds ────────────────────────────────────────

    #[test]
    fn test_nothing_before_anchor() {
        let dates = expand(
            "FREQ=DAILY;INTERVAL=1",
            date(2024, 1, 5),
            date(2024, 1, 1),
            date(2024, 1, 7),
        );
        assert_eq!(dates, vec![date(2024, 1, 5), date(2024, 1, 6), date(2024, 1, 7)]);
    }

    #[test]
    fn test_window_before_anchor_is_empty() {
        let dates = expand(
            "FREQ=DAILY;INTERVAL=1",
            date(2024, 6, 1),
            date(2024, 1, 1),
            date(2024, 1, 31),
        );
        assert!(dates.is_empty());
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let dates = expand(
            "FREQ=DAILY;INTERVAL=1",
            date(2024, 1, 1),
            date(2024, 2, 1),
            date(2024, 1, 1),
        );
        assert!(dates.is_empty());
    }

    #[test]
    fn test_until_before_window_is_empty() {
        let dates = expand(
            "FREQ=DAILY;INTERVAL=1;UNTIL=20240110T235959Z",
            date(2024, 1, 1),
            date(2024, 2, 1),
            date(2024, 2, 28),
        );
        assert!(dates.is_empty());
    }

    #[test]
    fn test_embedded_dtstart_is_overridden_by_anchor() {
        let dates = expand(
            "DTSTART:20200101T000000Z\nRRULE:FREQ=DAILY;INTERVAL=1",
            date(2024, 1, 5),
            date(2024, 1, 1),
            date(2024, 1, 6),
        );
        assert_eq!(dates, vec![date(2024, 1, 5), date(2024, 1, 6)]);
    }

    // ── fast-forwarding old anchors ─────────────────────────────────────

    #[test]
    fn test_old_daily_anchor_stays_aligned() {
        // 8766 days from 2000-01-01 to 2024-01-01, a multiple of 3
        let dates = expand(
            "FREQ=DAILY;INTERVAL=3",
            date(2000, 1, 1),
            date(2024, 1, 1),
            date(2024, 1, 10),
        );
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 4), date(2024, 1, 7), date(2024, 1, 10)]
        );
    }

    #[test]
    fn test_old_biweekly_anchor_stays_aligned() {
        // Jan 2 2023 → Jan 1 2024 is 52 weeks, an even count
        let dates = expand(
            "FREQ=WEEKLY;INTERVAL=2",
            date(2023, 1, 2),
            date(2024, 1, 1),
            date(2024, 1, 31),
        );
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 15), date(2024, 1, 29)]);
    }

    #[test]
    fn test_old_monthly_anchor_keeps_day_number() {
        let dates = expand(
            "FREQ=MONTHLY;INTERVAL=1",
            date(2020, 1, 31),
            date(2024, 2, 1),
            date(2024, 5, 31),
        );
        assert_eq!(dates, vec![date(2024, 3, 31), date(2024, 5, 31)]);
    }

    #[test]
    fn test_old_bimonthly_anchor_keeps_parity() {
        // Anchored in January: odd months only
        let dates = expand(
            "FREQ=MONTHLY;INTERVAL=2",
            date(2021, 1, 15),
            date(2024, 2, 1),
            date(2024, 7, 31),
        );
        assert_eq!(dates, vec![date(2024, 3, 15), date(2024, 5, 15), date(2024, 7, 15)]);
    }

    #[test]
    fn test_fast_forward_skips_count_rules() {
        let rule: RecurrenceRule = "FREQ=DAILY;COUNT=3".parse().unwrap();
        assert!(fast_forward(&rule, date(2020, 1, 1), date(2024, 1, 1)).is_none());
        let dates = expand(
            "FREQ=DAILY;COUNT=3",
            date(2024, 1, 1),
            date(2024, 1, 1),
            date(2024, 1, 31),
        );
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
    }

    #[test]
    fn test_fast_forward_adds_implied_month_day() {
        let rule: RecurrenceRule = "FREQ=MONTHLY;INTERVAL=1".parse().unwrap();
        let (start, shifted) = fast_forward(&rule, date(2020, 1, 31), date(2024, 2, 10)).unwrap();
        assert_eq!(start, date(2024, 2, 1));
        assert_eq!(shifted.by_month_day, vec![31]);
    }

    // ── malformed input ─────────────────────────────────────────────────

    #[test]
    fn test_malformed_rules_expand_to_nothing() {
        for bad in ["", "garbage", "FREQ=NEVER", "FREQ=DAILY;INTERVAL=0", "RRULE:"] {
            let dates = expand(bad, date(2024, 1, 1), date(2024, 1, 1), date(2024, 1, 31));
            assert!(dates.is_empty(), "{bad:?} produced {dates:?}");
        }
    }

    #[test]
    fn test_numbered_weekday_needs_monthly_or_yearly() {
        for bad in ["FREQ=WEEKLY;BYDAY=1MO", "FREQ=DAILY;BYDAY=2TU"] {
            let dates = expand(bad, date(2024, 1, 1), date(2024, 1, 1), date(2024, 1, 31));
            assert!(dates.is_empty(), "{bad:?} produced {dates:?}");
        }
    }

    #[test]
    fn test_unbounded_window_does_not_panic() {
        let dates = expand(
            "FREQ=MONTHLY;INTERVAL=1",
            date(2024, 1, 15),
            NaiveDate::MIN,
            NaiveDate::MAX,
        );
        assert!(dates.iter().all(|d| *d >= date(2024, 1, 15)));
    }

    #[test]
    fn test_expansion_is_repeatable() {
        let rule = "FREQ=WEEKLY;INTERVAL=1;BYDAY=TU,FR";
        let first = expand(rule, date(2024, 1, 2), date(2024, 1, 1), date(2024, 3, 31));
        let second = expand(rule, date(2024, 1, 2), date(2024, 1, 1), date(2024, 3, 31));
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
    }
}
