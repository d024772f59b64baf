//! Rule Parser: stored rule string → [`RecurrenceConfig`] for re-editing.
//!
//! Best-effort inverse of [`crate::builder::config_to_rule`]. Only the four
//! shapes the builder emits round-trip; anything else falls back to the
//! default config. `custom` comes back as `weekly`, which builds the same rule.

use crate::config::{Frequency, MonthlyType, RecurrenceConfig};
use crate::dates::weekday_index;
use crate::rule::{RecurrenceRule, RuleFrequency};

/// Rebuild the form configuration from a stored rule.
///
/// # Examples
///
/// ```
/// use chore_engine::config::{Frequency, MonthlyType};
/// use chore_engine::parser::parse_rule;
///
/// let config = parse_rule(Some("FREQ=MONTHLY;INTERVAL=2;BYDAY=2WE"));
/// assert_eq!(config.frequency, Frequency::Monthly);
/// assert_eq!(config.interval, 2);
/// assert_eq!(config.monthly_type, MonthlyType::DayOfWeek);
/// ```
pub fn parse_rule(rule: Option<&str>) -> RecurrenceConfig {
    let Some(rule) = rule.map(str::trim).filter(|r| !r.is_empty()) else {
        return RecurrenceConfig::default();
    };
    match rule.parse::<RecurrenceRule>() {
        Ok(parsed) => rule_to_config(&parsed),
        Err(err) => {
            log::debug!("falling back to the default config for {rule:?}: {err}");
            RecurrenceConfig::default()
        }
    }
}

/// Typed form of [`parse_rule`].
pub fn rule_to_config(rule: &RecurrenceRule) -> RecurrenceConfig {
    let mut config = RecurrenceConfig {
        // Copied as-is: a rule from another tool may exceed the form's range,
        // and clamping it would change the schedule on the next save.
        interval: rule.interval.max(1),
        end_date: rule.until,
        ..RecurrenceConfig::default()
    };

    match rule.frequency {
        RuleFrequency::Daily => config.frequency = Frequency::Daily,
        RuleFrequency::Weekly => {
            config.frequency = Frequency::Weekly;
            config.weekdays = rule.by_day.iter().map(|d| weekday_index(d.weekday)).collect();
        }
        RuleFrequency::Monthly => {
            config.frequency = Frequency::Monthly;
            if rule.by_day.iter().any(|d| d.ordinal.is_some()) {
                config.monthly_type = MonthlyType::DayOfWeek;
            }
        }
        _ => return RecurrenceConfig::default(),
    }
    config
}

// ── Tests ───────────────────────────────────────────────────────────────────
