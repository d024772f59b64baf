//! Calendar events: tasks flattened into per-date, coloured entries.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::colors::{hex_to_rgba, UNASSIGNED_COLOR};
use crate::dates::format_date;
use crate::state::AppState;
use crate::task::Task;
use crate::window::CalendarWindow;

const COMPLETED_ALPHA: f64 = 0.3;
const COMPLETED_TEXT: &str = "#6b7280";
const ACTIVE_TEXT: &str = "#ffffff";
const UNASSIGNED_NAME: &str = "Unassigned";

/// One all-day entry on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// `<taskId>-<date>` for occurrences of a recurring task, the task id otherwise.
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub start: NaiveDate,
    /// Exclusive end, only set for multi-day one-off tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    pub background_color: String,
    pub border_color: String,
    pub text_color: String,
    pub is_completed: bool,
    pub assignee_name: String,
}

/// Every event visible in `window`, ordered by start date then title.
pub fn build_events(state: &AppState, window: &CalendarWindow) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = state
        .tasks
        .iter()
        .flat_map(|task| task_events(state, task, window))
        .collect();
    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.title.cmp(&b.title)));
    events
}

fn task_events(state: &AppState, task: &Task, window: &CalendarWindow) -> Vec<CalendarEvent> {
    let member = task.assignee_id.as_deref().and_then(|id| state.member(id));
    let color = member.map_or(UNASSIGNED_COLOR, |m| m.color.as_str());
    let assignee = member.map_or(UNASSIGNED_NAME, |m| m.name.as_str());
    let recurring = task.is_recurring();

    task.occurrences(window)
        .into_iter()
        .map(|date| {
            let is_completed = task.is_completed_on(date);
            let (id, end) = if recurring {
                (format!("{}-{}", task.id, format_date(date)), None)
            } else {
                (task.id.clone(), task.end_date.and_then(|e| e.checked_add_days(Days::new(1))))
            };
            CalendarEvent {
                id,
                task_id: task.id.clone(),
                title: task.title.clone(),
                start: date,
                end,
                background_color: if is_completed { faded(color) } else { color.to_string() },
                border_color: color.to_string(),
                text_color: if is_completed { COMPLETED_TEXT } else { ACTIVE_TEXT }.to_string(),
                is_completed,
                assignee_name: assignee.to_string(),
            }
        })
        .collect()
}

fn faded(color: &str) -> String {
    hex_to_rgba(color, COMPLETED_ALPHA).unwrap_or_else(|err| {
        log::warn!("{err}; using it unfaded");
        color.to_string()
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{NewTask, TeamMember};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> CalendarWindow {
        CalendarWindow::new(date(2024, 1, 1), date(2024, 1, 31))
    }

    fn state() -> AppState {
        let mut weekly = NewTask::new("Water plants", date(2024, 1, 1));
        weekly.recurrence_rule = Some("FREQ=WEEKLY;INTERVAL=1".to_string());
        weekly.assignee_id = Some("m1".to_string());
        let mut weekly = weekly.with_id("w");
        weekly.toggle_completion("2024-01-08");

        let mut trip = NewTask::new("Deep clean", date(2024, 1, 3));
        trip.end_date = Some(date(2024, 1, 5));
        trip.assignee_id = Some("gone".to_string());

        AppState {
            team_members: vec![TeamMember {
                id: "m1".to_string(),
                name: "Ana".to_string(),
                color: "#ec4899".to_string(),
                region: None,
            }],
            tasks: vec![weekly, trip.with_id("d")],
        }
    }

    #[test]
    fn test_recurring_events_get_dated_ids() {
        let events = build_events(&state(), &january());
        let ids: Vec<&str> = events
            .iter()
            .filter(|e| e.task_id == "w")
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "w-2024-01-01",
                "w-2024-01-08",
                "w-2024-01-15",
                "w-2024-01-22",
                "w-2024-01-29"
            ]
        );
    }

    #[test]
    fn test_one_off_event_has_exclusive_end() {
        let events = build_events(&state(), &january());
        let trip = events.iter().find(|e| e.id == "d").unwrap();
        assert_eq!(trip.start, date(2024, 1, 3));
        assert_eq!(trip.end, Some(date(2024, 1, 6)));
    }

    #[test]
    fn test_colours_follow_assignee_and_completion() {
        let events = build_events(&state(), &january());
        let done = events.iter().find(|e| e.id == "w-2024-01-08").unwrap();
        assert!(done.is_completed);
        assert_eq!(done.background_color, "rgba(236, 72, 153, 0.3)");
        assert_eq!(done.border_color, "#ec4899");
        assert_eq!(done.text_color, "#6b7280");

        let open = events.iter().find(|e| e.id == "w-2024-01-15").unwrap();
        assert_eq!(open.background_color, "#ec4899");
        assert_eq!(open.text_color, "#ffffff");
        assert_eq!(open.assignee_name, "Ana");
    }

    #[test]
    fn test_unknown_assignee_is_unassigned() {
        let events = build_events(&state(), &january());
        let trip = events.iter().find(|e| e.id == "d").unwrap();
        assert_eq!(trip.assignee_name, "Unassigned");
        assert_eq!(trip.background_color, UNASSIGNED_COLOR);
    }

    #[test]
    fn test_events_sorted_by_start_then_title() {
        let events = build_events(&state(), &january());
        let starts: Vec<NaiveDate> = events.iter().map(|e| e.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        assert_eq!(events[0].id, "w-2024-01-01");
        assert_eq!(events[1].id, "d");
    }

    #[test]
    fn test_out_of_window_tasks_are_skipped() {
        let window = CalendarWindow::new(date(2023, 6, 1), date(2023, 6, 30));
        assert!(build_events(&state(), &window).is_empty());
    }
}
