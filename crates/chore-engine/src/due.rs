//! Due summary: how many open occurrences are coming up or overdue.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::state::AppState;
use crate::window::CalendarWindow;

/// How far back a missed occurrence of a recurring task still counts.
pub const OVERDUE_LOOKBACK_DAYS: u64 = 7;
/// Today plus this many days minus one count as upcoming.
pub const UPCOMING_DAYS: u64 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DueSummary {
    pub upcoming: usize,
    pub overdue: usize,
}

impl DueSummary {
    pub fn is_empty(&self) -> bool {
        self.upcoming == 0 && self.overdue == 0
    }
}

/// Count uncompleted occurrences due today or tomorrow, and those already
/// missed.
///
/// Recurring tasks only look back [`OVERDUE_LOOKBACK_DAYS`]. A one-off task
/// whose start date has passed stays overdue until it is marked done.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chore_engine::due::due_summary;
/// use chore_engine::state::AppState;
/// use chore_engine::task::NewTask;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let mut state = AppState::default();
/// state.tasks.push(NewTask::new("Bins", today).with_id("t1"));
/// let summary = due_summary(&state, today);
/// assert_eq!((summary.upcoming, summary.overdue), (1, 0));
/// ```
pub fn due_summary(state: &AppState, today: NaiveDate) -> DueSummary {
    let horizon = today
        .checked_add_days(Days::new(UPCOMING_DAYS))
        .unwrap_or(NaiveDate::MAX);
    let lookback = CalendarWindow::new(
        today
            .checked_sub_days(Days::new(OVERDUE_LOOKBACK_DAYS))
            .unwrap_or(NaiveDate::MIN),
        horizon.pred_opt().unwrap_or(horizon),
    );

    let mut summary = DueSummary::default();
    for task in &state.tasks {
        let dates = if task.is_recurring() {
            task.occurrences(&lookback)
        } else {
            vec![task.start_date]
        };
        for date in dates.into_iter().filter(|d| !task.is_completed_on(*d)) {
            if date < today {
                summary.overdue += 1;
            } else if date < horizon {
                summary.upcoming += 1;
            }
        }
    }
    log::debug!(
        "{} upcoming and {} overdue as of {today}",
        summary.upcoming,
        summary.overdue
    );
    summary
}

// ── Tests ───────────────────────────────────────────────────────────────────
