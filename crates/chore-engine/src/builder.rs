//! Rule Builder: [`RecurrenceConfig`] → canonical rule string.
//!
//! The anchor (the task's start date) is only consulted for monthly
//! "same weekday" rules, which must name the ordinal explicitly. Everything the
//! anchor implies on its own (the weekday of a plain weekly rule, the day number
//! of a monthly rule) is left out of the string so that moving the task's start
//! date moves its recurrence with it.

use chrono::{Datelike, NaiveDate};

use crate::config::{Frequency, MonthlyType, RecurrenceConfig};
use crate::dates::{nth_weekday_of_month, weekday_from_index};
use crate::rule::{ByDay, RecurrenceRule, RuleFrequency};

/// Build the rule string for a config, or `None` when it does not repeat.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chore_engine::builder::config_to_rule;
/// use chore_engine::config::{Frequency, MonthlyType, RecurrenceConfig};
///
/// // Wednesday the 10th → "2nd Wednesday of the month"
/// let anchor = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let config = RecurrenceConfig::every(Frequency::Monthly, 1)
///     .with_monthly_type(MonthlyType::DayOfWeek);
/// assert_eq!(
///     config_to_rule(&config, anchor).as_deref(),
///     Some("FREQ=MONTHLY;INTERVAL=1;BYDAY=2WE"),
/// );
/// ```
pub fn config_to_rule(config: &RecurrenceConfig, anchor: NaiveDate) -> Option<String> {
    build_rule(config, anchor).map(|rule| rule.to_string())
}

/// Typed form of [`config_to_rule`].
pub fn build_rule(config: &RecurrenceConfig, anchor: NaiveDate) -> Option<RecurrenceRule> {
    let mut rule = match config.frequency {
        Frequency::None => return None,
        Frequency::Daily => RecurrenceRule::new(RuleFrequency::Daily),
        Frequency::Weekly | Frequency::Custom => {
            let mut rule = RecurrenceRule::new(RuleFrequency::Weekly);
            rule.by_day = weekday_set(config);
            rule
        }
        Frequency::Monthly => {
            let mut rule = RecurrenceRule::new(RuleFrequency::Monthly);
            if config.monthly_type == MonthlyType::DayOfWeek {
                let nth = nth_weekday_of_month(anchor) as i8;
                rule.by_day = vec![ByDay::nth(nth, anchor.weekday())];
            }
            rule
        }
    };

    rule.interval = config.interval.max(1);
    rule.until = config.end_date;
    Some(rule)
}

/// Config weekdays in Monday-first order. Out-of-range indices are dropped.
fn weekday_set(config: &RecurrenceConfig) -> Vec<ByDay> {
    config
        .weekdays
        .iter()
        .filter_map(|&index| {
            let weekday = weekday_from_index(index);
            if weekday.is_none() {
                log::warn!("ignoring weekday index {index} (expected 0..=6)");
            }
            weekday
        })
        .map(ByDay::every)
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────────────
