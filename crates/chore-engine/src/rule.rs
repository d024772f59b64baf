//! Typed view of an RFC 5545 `RRULE` value.
//!
//! Parsing is done by the `rrule` crate; [`RecurrenceRule`] is the subset of
//! its fields chores actually use (`FREQ`, `INTERVAL`, `BYDAY`, `BYMONTHDAY`,
//! `UNTIL`, `COUNT`, `WKST`). Other standard parts are carried verbatim in
//! [`RecurrenceRule::extra`] so a rule authored by another tool still expands
//! faithfully. Its `Display` output is the canonical string stored on a task.
//!
//! Accepted input is a bare value (`FREQ=DAILY`), an `RRULE:` line, or a
//! multi-line block with `DTSTART:`/`RRULE:` lines. An embedded `DTSTART` is
//! ignored: the anchor always comes from the task.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use rrule::{Frequency, NWeekday, RRule, Unvalidated};

use crate::dates::weekday_index;
use crate::error::{ChoreError, Result};

/// `FREQ` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFrequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minutely,
    Secondly,
}

impl RuleFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleFrequency::Yearly => "YEARLY",
            RuleFrequency::Monthly => "MONTHLY",
            RuleFrequency::Weekly => "WEEKLY",
            RuleFrequency::Daily => "DAILY",
            RuleFrequency::Hourly => "HOURLY",
            RuleFrequency::Minutely => "MINUTELY",
            RuleFrequency::Secondly => "SECONDLY",
        }
    }
}

impl From<Frequency> for RuleFrequency {
    fn from(freq: Frequency) -> Self {
        match freq {
            Frequency::Yearly => RuleFrequency::Yearly,
            Frequency::Monthly => RuleFrequency::Monthly,
            Frequency::Weekly => RuleFrequency::Weekly,
            Frequency::Daily => RuleFrequency::Daily,
            Frequency::Hourly => RuleFrequency::Hourly,
            Frequency::Minutely => RuleFrequency::Minutely,
            Frequency::Secondly => RuleFrequency::Secondly,
        }
    }
}

/// One `BYDAY` entry: a weekday, optionally with a signed ordinal
/// (`2WE` = second Wednesday, `-1FR` = last Friday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByDay {
    pub ordinal: Option<i8>,
    pub weekday: Weekday,
}

impl ByDay {
    /// Every `weekday` within the period.
    pub fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    /// The `ordinal`-th `weekday` within the period.
    pub fn nth(ordinal: i8, weekday: Weekday) -> Self {
        Self {
            ordinal: Some(ordinal),
            weekday,
        }
    }
}

impl fmt::Display for ByDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.ordinal {
            write!(f, "{n}")?;
        }
        f.write_str(weekday_code(self.weekday))
    }
}

impl TryFrom<&NWeekday> for ByDay {
    type Error = ChoreError;

    fn try_from(day: &NWeekday) -> Result<Self> {
        match day {
            NWeekday::Every(weekday) => Ok(ByDay::every(*weekday)),
            NWeekday::Nth(n, weekday) => match i8::try_from(*n) {
                Ok(nth) if nth != 0 && (-53..=53).contains(&nth) => Ok(ByDay::nth(nth, *weekday)),
                _ => Err(ChoreError::InvalidRule(format!("BYDAY ordinal out of range: {n}"))),
            },
        }
    }
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: RuleFrequency,
    /// Always ≥ 1.
    pub interval: u32,
    pub by_day: Vec<ByDay>,
    pub by_month_day: Vec<i8>,
    /// Inclusive last calendar day.
    pub until: Option<NaiveDate>,
    pub count: Option<u32>,
    /// `None` means the RFC 5545 default, Monday.
    pub week_start: Option<Weekday>,
    /// Unmodelled standard parts as `(NAME, value)`.
    pub extra: Vec<(String, String)>,
}

impl RecurrenceRule {
    pub fn new(frequency: RuleFrequency) -> Self {
        Self {
            frequency,
            interval: 1,
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            until: None,
            count: None,
            week_start: None,
            extra: Vec::new(),
        }
    }

    /// True when every part of the rule is one this type models.
    pub fn is_fully_modelled(&self) -> bool {
        self.extra.is_empty()
    }
}

impl fmt::Display for RecurrenceRule {
    /// Canonical order: FREQ, INTERVAL, BYDAY, BYMONTHDAY, extras, WKST, COUNT, UNTIL.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={};INTERVAL={}", self.frequency.as_str(), self.interval)?;
        if !self.by_day.is_empty() {
            let days: Vec<String> = self.by_day.iter().map(ByDay::to_string).collect();
            write!(f, ";BYDAY={}", days.join(","))?;
        }
        if !self.by_month_day.is_empty() {
            let days: Vec<String> = self.by_month_day.iter().map(i8::to_string).collect();
            write!(f, ";BYMONTHDAY={}", days.join(","))?;
        }
        for (name, value) in &self.extra {
            write!(f, ";{name}={value}")?;
        }
        if let Some(wkst) = self.week_start {
            write!(f, ";WKST={}", weekday_code(wkst))?;
        }
        if let Some(count) = self.count {
            write!(f, ";COUNT={count}")?;
        }
        if let Some(until) = self.until {
            write!(f, ";UNTIL={}T235959Z", until.format("%Y%m%d"))?;
        }
        Ok(())
    }
}

impl FromStr for RecurrenceRule {
    type Err = ChoreError;

    fn from_str(s: &str) -> Result<Self> {
        let body = rule_body(s)?;
        let parsed = body
            .parse::<RRule<Unvalidated>>()
            .map_err(|e| ChoreError::InvalidRule(e.to_string()))?;
        RecurrenceRule::try_from(&parsed)
    }
}

impl TryFrom<&RRule<Unvalidated>> for RecurrenceRule {
    type Error = ChoreError;

    /// Adds the checks chores rely on that `rrule` leaves to validation time.
    fn try_from(parsed: &RRule<Unvalidated>) -> Result<Self> {
        let mut rule = RecurrenceRule::new(parsed.get_freq().into());

        rule.interval = u32::from(parsed.get_interval());
        if rule.interval == 0 {
            return Err(ChoreError::InvalidRule("INTERVAL must be ≥ 1".into()));
        }

        rule.by_day = parsed
            .get_by_weekday()
            .iter()
            .map(ByDay::try_from)
            .collect::<Result<Vec<_>>>()?;
        let ordinal_allowed = matches!(
            rule.frequency,
            RuleFrequency::Monthly | RuleFrequency::Yearly
        );
        if !ordinal_allowed && rule.by_day.iter().any(|d| d.ordinal.is_some()) {
            return Err(ChoreError::InvalidRule(format!(
                "numbered BYDAY needs FREQ=MONTHLY or YEARLY, not {}",
                rule.frequency.as_str()
            )));
        }

        rule.by_month_day = parsed.get_by_month_day().to_vec();
        if let Some(bad) = rule.by_month_day.iter().find(|d| **d == 0 || !(-31..=31).contains(*d)) {
            return Err(ChoreError::InvalidRule(format!("BYMONTHDAY out of range: {bad}")));
        }

        rule.until = parsed.get_until().map(|until| until.date_naive());
        rule.count = parsed.get_count();
        if rule.count.is_some() && rule.until.is_some() {
            return Err(ChoreError::InvalidRule(
                "COUNT and UNTIL are mutually exclusive".to_string(),
            ));
        }

        let week_start = parsed.get_week_start();
        rule.week_start = (week_start != Weekday::Mon).then_some(week_start);

        push_extra(&mut rule.extra, "BYMONTH", parsed.get_by_month());
        push_extra(&mut rule.extra, "BYSETPOS", parsed.get_by_set_pos());
        push_extra(&mut rule.extra, "BYYEARDAY", parsed.get_by_year_day());
        push_extra(&mut rule.extra, "BYWEEKNO", parsed.get_by_week_no());
        push_extra(&mut rule.extra, "BYHOUR", parsed.get_by_hour());
        push_extra(&mut rule.extra, "BYMINUTE", parsed.get_by_minute());
        push_extra(&mut rule.extra, "BYSECOND", parsed.get_by_second());
        Ok(rule)
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// The `RRULE` value from a bare value, an `RRULE:` line, or a multi-line
/// `DTSTART`/`RRULE` block, upper-cased with empty parts dropped.
fn rule_body(s: &str) -> Result<String> {
    let mut body = None;
    for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let upper = line.to_ascii_uppercase();
        let candidate = if let Some(rest) = upper.strip_prefix("RRULE:") {
            rest.to_string()
        } else if upper.starts_with("FREQ=") {
            upper
        } else if upper.starts_with("DTSTART") {
            continue;
        } else {
            return Err(ChoreError::InvalidRule(format!("unexpected line '{line}'")));
        };
        if body.replace(candidate).is_some() {
            return Err(ChoreError::InvalidRule("more than one RRULE line".to_string()));
        }
    }
    let body = body.ok_or_else(|| ChoreError::InvalidRule("no RRULE found".to_string()))?;
    let parts: Vec<&str> = body.split(';').map(str::trim).filter(|p| !p.is_empty()).collect();
    Ok(parts.join(";"))
}

fn push_extra<T: fmt::Display>(extra: &mut Vec<(String, String)>, name: &str, values: &[T]) {
    if !values.is_empty() {
        let joined: Vec<String> = values.iter().map(T::to_string).collect();
        extra.push((name.to_string(), joined.join(",")));
    }
}

/// Two-letter RRULE weekday code.
pub(crate) fn weekday_code(weekday: Weekday) -> &'static str {
    ["MO", "TU", "WE", "TH", "FR", "SA", "SU"][weekday_index(weekday) as usize]
}

// ── Tests ───────────────────────────────────────────────────────────────────
