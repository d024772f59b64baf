//! Form-facing recurrence configuration.
//!
//! A [`RecurrenceConfig`] is what an editing form holds. It is turned into a
//! rule string by [`crate::builder::config_to_rule`] on save and rebuilt from a
//! stored rule by [`crate::parser::parse_rule`]; it is never persisted itself.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bound of the "repeat every N" input.
pub const MAX_INTERVAL: u32 = 99;

/// How often a task repeats.
///
/// `Custom` is a form alias for `Weekly` with an explicit weekday set.
/// Unrecognised textual values decode as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::None => "none",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Custom => "custom",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            "custom" => Frequency::Custom,
            _ => Frequency::None,
        })
    }
}

impl From<String> for Frequency {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(f) => f,
            Err(never) => match never {},
        }
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.as_str().to_string()
    }
}

/// Which day a monthly task lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonthlyType {
    /// Same day number every month ("the 15th").
    #[default]
    DayOfMonth,
    /// Same ordinal weekday every month ("the 2nd Tuesday").
    DayOfWeek,
}

/// Structured repeat settings as edited in a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceConfig {
    pub frequency: Frequency,
    pub interval: u32,
    /// Monday = 0 .. Sunday = 6.
    #[serde(default)]
    pub weekdays: BTreeSet<u8>,
    #[serde(default)]
    pub monthly_type: MonthlyType,
    /// Inclusive last day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::None,
            interval: 1,
            weekdays: BTreeSet::new(),
            monthly_type: MonthlyType::DayOfMonth,
            end_date: None,
        }
    }
}

impl RecurrenceConfig {
    /// A config repeating at `frequency` every `interval` units.
    pub fn every(frequency: Frequency, interval: u32) -> Self {
        Self {
            frequency,
            interval: clamp_interval(interval as i64),
            ..Self::default()
        }
    }

    pub fn with_weekdays(mut self, weekdays: impl IntoIterator<Item = u8>) -> Self {
        self.weekdays = weekdays.into_iter().collect();
        self
    }

    pub fn with_monthly_type(mut self, monthly_type: MonthlyType) -> Self {
        self.monthly_type = monthly_type;
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.frequency != Frequency::None
    }
}

/// Clamp a raw "repeat every N" input into `1..=MAX_INTERVAL`.
pub fn clamp_interval(raw: i64) -> u32 {
    raw.clamp(1, MAX_INTERVAL as i64) as u32
}

// ── Tests ───────────────────────────────────────────────────────────────────
