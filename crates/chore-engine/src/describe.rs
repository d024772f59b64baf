//! Rule Describer: rule string → short English phrase for list views.

use crate::dates::weekday_full_name;
use crate::rule::{ByDay, RecurrenceRule, RuleFrequency};

/// Phrase for a task without a rule.
pub const ONE_TIME: &str = "One-time";

/// Phrase for a rule that cannot be read.
pub const CUSTOM_SCHEDULE: &str = "Custom schedule";

/// Describe a stored rule.
///
/// # Examples
///
/// ```
/// use chore_engine::describe::describe;
///
/// assert_eq!(describe(None), "One-time");
/// assert_eq!(
///     describe(Some("FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH;UNTIL=20250131T235959Z")),
///     "every 2 weeks on Tuesday, Thursday, until January 31, 2025",
/// );
/// assert_eq!(describe(Some("gibberish")), "Custom schedule");
/// ```
pub fn describe(rule: Option<&str>) -> String {
    let Some(rule) = rule.map(str::trim).filter(|r| !r.is_empty()) else {
        return ONE_TIME.to_string();
    };
    match rule.parse::<RecurrenceRule>() {
        Ok(parsed) => describe_rule(&parsed),
        Err(err) => {
            log::debug!("describing unreadable rule {rule:?} as a custom schedule: {err}");
            CUSTOM_SCHEDULE.to_string()
        }
    }
}

/// Describe a parsed rule.
pub fn describe_rule(rule: &RecurrenceRule) -> String {
    let mut text = every(rule.frequency, rule.interval);

    if !rule.by_day.is_empty() {
        let days: Vec<String> = rule.by_day.iter().map(by_day_phrase).collect();
        let joined = days.join(", ");
        if rule.by_day.iter().any(|d| d.ordinal.is_some()) {
            text.push_str(&format!(" on the {joined}"));
        } else {
            text.push_str(&format!(" on {joined}"));
        }
    }

    if !rule.by_month_day.is_empty() {
        let days: Vec<String> = rule.by_month_day.iter().map(|&d| month_day_phrase(d)).collect();
        text.push_str(&format!(" on the {}", days.join(", ")));
    }

    if let Some(count) = rule.count {
        let times = if count == 1 { "time" } else { "times" };
        text.push_str(&format!(", {count} {times}"));
    }

    if let Some(until) = rule.until {
        text.push_str(&format!(", until {}", until.format("%B %-d, %Y")));
    }

    text
}

fn every(frequency: RuleFrequency, interval: u32) -> String {
    let unit = match frequency {
        RuleFrequency::Yearly => "year",
        RuleFrequency::Monthly => "month",
        RuleFrequency::Weekly => "week",
        RuleFrequency::Daily => "day",
        RuleFrequency::Hourly => "hour",
        RuleFrequency::Minutely => "minute",
        RuleFrequency::Secondly => "second",
    };
    if interval <= 1 {
        format!("every {unit}")
    } else {
        format!("every {interval} {unit}s")
    }
}

fn by_day_phrase(day: &ByDay) -> String {
    let name = weekday_full_name(day.weekday);
    match day.ordinal {
        None => name.to_string(),
        Some(-1) => format!("last {name}"),
        Some(n) if n < 0 => format!("{} to last {name}", ordinal(-n as i32)),
        Some(n) => format!("{} {name}", ordinal(n as i32)),
    }
}

fn month_day_phrase(day: i8) -> String {
    match day {
        -1 => "last day".to_string(),
        d if d < 0 => format!("{} to last day", ordinal(-d as i32)),
        d => ordinal(d as i32),
    }
}

/// `1` → `1st`, `12` → `12th`, `22` → `22nd`.
fn ordinal(n: i32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

// ── Tests ───────────────────────────────────────────────────────────────────
