//! Tasks, team members, and per-date completion.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::format_date;
use crate::describe::describe;
use crate::expander::expand;
use crate::window::CalendarWindow;

/// Region a team member belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "BC")]
    BritishColumbia,
    #[serde(rename = "AB")]
    Alberta,
    #[serde(rename = "SK")]
    Saskatchewan,
    #[serde(rename = "MB")]
    Manitoba,
    #[serde(rename = "GTA-N")]
    GtaNorth,
    #[serde(rename = "GTA-S")]
    GtaSouth,
    #[serde(rename = "ON-E")]
    OntarioEast,
    #[serde(rename = "ON-W")]
    OntarioWest,
    #[serde(rename = "Central")]
    Central,
    #[serde(rename = "QC")]
    Quebec,
    #[serde(rename = "NS")]
    NovaScotia,
    #[serde(rename = "NL")]
    Newfoundland,
    #[serde(rename = "PE")]
    PrinceEdwardIsland,
    #[serde(rename = "YK")]
    Yukon,
    #[serde(rename = "NT")]
    Nunavut,
    #[serde(rename = "NWT")]
    NorthwestTerritories,
}

impl Region {
    pub const ALL: [Region; 16] = [
        Region::BritishColumbia,
        Region::Alberta,
        Region::Saskatchewan,
        Region::Manitoba,
        Region::GtaNorth,
        Region::GtaSouth,
        Region::OntarioEast,
        Region::OntarioWest,
        Region::Central,
        Region::Quebec,
        Region::NovaScotia,
        Region::Newfoundland,
        Region::PrinceEdwardIsland,
        Region::Yukon,
        Region::Nunavut,
        Region::NorthwestTerritories,
    ];

    /// The short code used in stored data.
    pub fn code(self) -> &'static str {
        match self {
            Region::BritishColumbia => "BC",
            Region::Alberta => "AB",
            Region::Saskatchewan => "SK",
            Region::Manitoba => "MB",
            Region::GtaNorth => "GTA-N",
            Region::GtaSouth => "GTA-S",
            Region::OntarioEast => "ON-E",
            Region::OntarioWest => "ON-W",
            Region::Central => "Central",
            Region::Quebec => "QC",
            Region::NovaScotia => "NS",
            Region::Newfoundland => "NL",
            Region::PrinceEdwardIsland => "PE",
            Region::Yukon => "YK",
            Region::Nunavut => "NT",
            Region::NorthwestTerritories => "NWT",
        }
    }

    /// Look a region up by code, ignoring case.
    pub fn from_code(code: &str) -> Option<Region> {
        Region::ALL
            .into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(code.trim()))
    }
}

/// A person chores can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    /// `#rrggbb`
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
}

/// Fields for a member that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewMember {
    pub name: String,
    /// Picked from the palette when `None`.
    pub color: Option<String>,
    pub region: Option<Region>,
}

/// A chore: a one-off or recurring piece of work, optionally assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    /// Anchor of the recurrence, or the day of a one-off task.
    pub start_date: NaiveDate,
    /// Last day of a multi-day one-off task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<String>,
    /// `YYYY-MM-DD` keys of completed occurrences.
    #[serde(default)]
    pub completed: BTreeSet<String>,
    #[serde(default)]
    pub owner: String,
}

/// Fields for a task that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub recurrence_rule: Option<String>,
    pub owner: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            assignee_id: None,
            start_date,
            end_date: None,
            recurrence_rule: None,
            owner: String::new(),
        }
    }

    /// Give the new task an id; it starts with nothing completed.
    pub fn with_id(self, id: impl Into<String>) -> Task {
        Task {
            id: id.into(),
            title: self.title,
            description: self.description,
            assignee_id: self.assignee_id,
            start_date: self.start_date,
            end_date: self.end_date,
            recurrence_rule: self.recurrence_rule,
            completed: BTreeSet::new(),
            owner: self.owner,
        }
    }
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        self.rule().is_some()
    }

    /// The stored rule, treating an empty string as absent.
    pub fn rule(&self) -> Option<&str> {
        self.recurrence_rule
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Last day the task spans when it does not repeat.
    pub fn last_day(&self) -> NaiveDate {
        self.end_date
            .filter(|end| *end >= self.start_date)
            .unwrap_or(self.start_date)
    }

    /// Dates this task is due on within `window`.
    ///
    /// A one-off task yields its start date when any day of its span is
    /// visible, even if the start itself is before the window.
    pub fn occurrences(&self, window: &CalendarWindow) -> Vec<NaiveDate> {
        match self.rule() {
            Some(rule) => expand(rule, self.start_date, window.start, window.end),
            None if window.overlaps(self.start_date, self.last_day()) => vec![self.start_date],
            None => Vec::new(),
        }
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed.contains(&format_date(date))
    }

    /// Flip the completion mark for `date`; returns whether it is now completed.
    ///
    /// Marks are keyed by date only. They are not checked against the rule, so
    /// a later rule change can leave marks on dates that no longer occur.
    pub fn toggle_completion(&mut self, date: &str) -> bool {
        if self.completed.remove(date) {
            false
        } else {
            self.completed.insert(date.to_string());
            true
        }
    }

    /// Short phrase for the task's schedule.
    pub fn schedule(&self) -> String {
        describe(self.rule())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(rule: Option<&str>) -> Task {
        let mut new = NewTask::new("Take out bins", date(2024, 1, 1));
        new.recurrence_rule = rule.map(str::to_string);
        new.with_id("t1")
    }

    #[test]
    fn test_empty_rule_is_not_recurring() {
        assert!(!task(Some("")).is_recurring());
        assert!(!task(None).is_recurring());
        assert!(task(Some("FREQ=DAILY")).is_recurring());
    }

    #[test]
    fn test_recurring_occurrences_use_rule() {
        let window = CalendarWindow::new(date(2024, 1, 1), date(2024, 1, 21));
        let dates = task(Some("FREQ=WEEKLY;INTERVAL=1")).occurrences(&window);
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15)]);
    }

    #[test]
    fn test_one_off_occurrence_in_and_out_of_window() {
        let t = task(None);
        let inside = CalendarWindow::new(date(2023, 12, 1), date(2024, 1, 31));
        let outside = CalendarWindow::new(date(2024, 2, 1), date(2024, 2, 29));
        assert_eq!(t.occurrences(&inside), vec![date(2024, 1, 1)]);
        assert!(t.occurrences(&outside).is_empty());
    }

    #[test]
    fn test_multi_day_task_visible_from_its_tail() {
        let mut t = task(None);
        t.end_date = Some(date(2024, 1, 5));
        let window = CalendarWindow::new(date(2024, 1, 3), date(2024, 1, 31));
        assert_eq!(t.occurrences(&window), vec![date(2024, 1, 1)]);
    }

    #[test]
    fn test_toggle_completion_twice_restores() {
        let mut t = task(Some("FREQ=DAILY"));
        assert!(t.toggle_completion("2024-01-02"));
        assert!(t.is_completed_on(date(2024, 1, 2)));
        assert!(!t.toggle_completion("2024-01-02"));
        assert!(t.completed.is_empty());
    }

    #[test]
    fn test_completion_survives_rule_change() {
        let mut t = task(Some("FREQ=DAILY"));
        t.toggle_completion("2024-01-02");
        t.recurrence_rule = Some("FREQ=WEEKLY".to_string());
        // Jan 2 is no longer an occurrence, but the mark stays.
        assert!(t.is_completed_on(date(2024, 1, 2)));
    }

    #[test]
    fn test_schedule_phrase() {
        assert_eq!(task(None).schedule(), "One-time");
        assert_eq!(task(Some("FREQ=DAILY;INTERVAL=2")).schedule(), "every 2 days");
    }

    #[test]
    fn test_region_codes() {
        for region in Region::ALL {
            assert_eq!(Region::from_code(region.code()), Some(region));
            let json = serde_json::to_string(&region).unwrap();
            assert_eq!(json, format!("\"{}\"", region.code()));
        }
        assert_eq!(Region::from_code("gta-n"), Some(Region::GtaNorth));
        assert_eq!(Region::from_code("Mars"), None);
    }

    #[test]
    fn test_task_json_shape() {
        let t = task(Some("FREQ=DAILY"));
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["recurrenceRule"], "FREQ=DAILY");
        assert_eq!(json["assigneeId"], serde_json::Value::Null);
        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }
}
