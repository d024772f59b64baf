//! [`Planner`]: owns the state and its store, and is the mutation entry point.
//!
//! Every change is expressed as an [`Action`], applied with [`reduce`], and
//! then persisted. Unlike the reducer, the planner reports unknown ids as
//! errors.

use chrono::NaiveDate;

use crate::builder::config_to_rule;
use crate::calendar::{build_events, CalendarEvent};
use crate::colors::{hex_to_rgba, next_color};
use crate::config::RecurrenceConfig;
use crate::dates::format_date;
use crate::due::{due_summary, DueSummary};
use crate::error::{ChoreError, Result};
use crate::state::{reduce, Action, AppState};
use crate::store::TaskStore;
use crate::task::{NewMember, NewTask, Task, TeamMember};
use crate::window::CalendarWindow;

/// Chore planner backed by a [`TaskStore`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chore_engine::config::{Frequency, RecurrenceConfig};
/// use chore_engine::planner::Planner;
/// use chore_engine::store::MemoryStore;
/// use chore_engine::task::NewTask;
/// use chore_engine::window::CalendarWindow;
///
/// let mut planner = Planner::open(MemoryStore::default()).unwrap();
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let task = planner.add_task(NewTask::new("Bins", start)).unwrap();
/// planner
///     .set_recurrence(&task.id, &RecurrenceConfig::every(Frequency::Daily, 3))
///     .unwrap();
///
/// let window = CalendarWindow::new(start, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
/// assert_eq!(planner.occurrences(&task.id, &window).unwrap().len(), 4);
/// ```
#[derive(Debug)]
pub struct Planner<S: TaskStore> {
    store: S,
    state: AppState,
}

impl<S: TaskStore> Planner<S> {
    /// Load the current state from `store`.
    pub fn open(store: S) -> Result<Self> {
        let state = store.load()?;
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn task(&self, id: &str) -> Result<&Task> {
        self.state
            .task(id)
            .ok_or_else(|| ChoreError::UnknownTask(id.to_string()))
    }

    pub fn member(&self, id: &str) -> Result<&TeamMember> {
        self.state
            .member(id)
            .ok_or_else(|| ChoreError::UnknownMember(id.to_string()))
    }

    // ── Members ─────────────────────────────────────────────────────────────

    /// Add a member, picking the next free palette colour if none is given.
    ///
    /// # Errors
    ///
    /// [`ChoreError::InvalidColor`] if the given colour is not `#rrggbb`.
    pub fn add_member(&mut self, new: NewMember) -> Result<TeamMember> {
        let color = match new.color {
            Some(color) => {
                hex_to_rgba(&color, 1.0)?;
                color
            }
            None => {
                let used: Vec<&str> = self
                    .state
                    .team_members
                    .iter()
                    .map(|m| m.color.as_str())
                    .collect();
                next_color(&used).to_string()
            }
        };
        let member = TeamMember {
            id: new_id(),
            name: new.name,
            color,
            region: new.region,
        };
        self.apply(Action::AddMember(member.clone()))?;
        Ok(member)
    }

    pub fn update_member(&mut self, member: TeamMember) -> Result<()> {
        self.member(&member.id)?;
        hex_to_rgba(&member.color, 1.0)?;
        self.apply(Action::UpdateMember(member))
    }

    /// Remove a member; their tasks become unassigned.
    pub fn remove_member(&mut self, id: &str) -> Result<()> {
        self.member(id)?;
        self.apply(Action::DeleteMember(id.to_string()))
    }

    // ── Tasks ───────────────────────────────────────────────────────────────

    /// Add a task with a fresh id and no completions.
    ///
    /// # Errors
    ///
    /// [`ChoreError::UnknownMember`] if the assignee does not exist.
    pub fn add_task(&mut self, new: NewTask) -> Result<Task> {
        if let Some(assignee) = &new.assignee_id {
            self.member(assignee)?;
        }
        let task = new.with_id(new_id());
        self.apply(Action::AddTask(task.clone()))?;
        Ok(task)
    }

    pub fn update_task(&mut self, task: Task) -> Result<()> {
        self.task(&task.id)?;
        if let Some(assignee) = &task.assignee_id {
            self.member(assignee)?;
        }
        self.apply(Action::UpdateTask(task))
    }

    pub fn remove_task(&mut self, id: &str) -> Result<()> {
        self.task(id)?;
        self.apply(Action::DeleteTask(id.to_string()))
    }

    /// Replace a task's recurrence with the rule built from `config`, anchored
    /// on the task's start date. Returns the stored rule.
    pub fn set_recurrence(
        &mut self,
        task_id: &str,
        config: &RecurrenceConfig,
    ) -> Result<Option<String>> {
        let mut task = self.task(task_id)?.clone();
        task.recurrence_rule = config_to_rule(config, task.start_date);
        let rule = task.recurrence_rule.clone();
        log::debug!("task {task_id} now repeats as {rule:?}");
        self.apply(Action::UpdateTask(task))?;
        Ok(rule)
    }

    /// Flip completion of the task on `date`; returns whether it is now completed.
    pub fn toggle_completion(&mut self, task_id: &str, date: NaiveDate) -> Result<bool> {
        self.task(task_id)?;
        self.apply(Action::ToggleCompletion {
            task_id: task_id.to_string(),
            date: format_date(date),
        })?;
        Ok(self.task(task_id)?.is_completed_on(date))
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn occurrences(&self, task_id: &str, window: &CalendarWindow) -> Result<Vec<NaiveDate>> {
        Ok(self.task(task_id)?.occurrences(window))
    }

    pub fn events(&self, window: &CalendarWindow) -> Vec<CalendarEvent> {
        build_events(&self.state, window)
    }

    pub fn due(&self, today: NaiveDate) -> DueSummary {
        due_summary(&self.state, today)
    }

    /// The in-memory state only moves on once the store has accepted it.
    fn apply(&mut self, action: Action) -> Result<()> {
        let next = reduce(self.state.clone(), action);
        self.store.save(&next)?;
        self.state = next;
        Ok(())
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::MEMBER_COLORS;
    use crate::config::{Frequency, MonthlyType};
    use crate::store::{JsonFileStore, MemoryStore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn planner() -> Planner<MemoryStore> {
        Planner::open(MemoryStore::default()).unwrap()
    }

    /// Accepts loads but refuses every save.
    #[derive(Debug, Default)]
    struct FullDisk {
        state: AppState,
    }

    impl TaskStore for FullDisk {
        fn load(&self) -> Result<AppState> {
            Ok(self.state.clone())
        }

        fn save(&mut self, _state: &AppState) -> Result<()> {
            Err(ChoreError::Io(std::io::Error::other("disk full")))
        }
    }

    fn member(name: &str) -> NewMember {
        NewMember {
            name: name.to_string(),
            ..NewMember::default()
        }
    }

    #[test]
    fn test_members_get_palette_colours_in_order() {
        let mut p = planner();
        let a = p.add_member(member("Ana")).unwrap();
        let b = p.add_member(member("Ben")).unwrap();
        assert_eq!(a.color, MEMBER_COLORS[0]);
        assert_eq!(b.color, MEMBER_COLORS[1]);
        assert_ne!(a.id, b.id);
        assert_eq!(uuid::Uuid::parse_str(&a.id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_add_member_rejects_bad_colour() {
        let mut p = planner();
        let err = p
            .add_member(NewMember {
                color: Some("red".to_string()),
                ..member("Ana")
            })
            .unwrap_err();
        assert!(matches!(err, ChoreError::InvalidColor(_)));
        assert_eq!(p.store().saves(), 0);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut p = planner();
        let m = p.add_member(member("Ana")).unwrap();
        let mut new = NewTask::new("Dishes", date(2024, 1, 1));
        new.assignee_id = Some(m.id.clone());
        let t = p.add_task(new).unwrap();
        p.toggle_completion(&t.id, date(2024, 1, 1)).unwrap();
        assert_eq!(p.store().saves(), 3);
        assert_eq!(&p.store().load().unwrap(), p.state());
    }

    #[test]
    fn test_failed_save_leaves_state_untouched() {
        let mut seed = planner();
        let t = seed.add_task(NewTask::new("Dishes", date(2024, 1, 1))).unwrap();
        let mut p = Planner::open(FullDisk {
            state: seed.state().clone(),
        })
        .unwrap();
        let before = p.state().clone();

        assert!(matches!(
            p.toggle_completion(&t.id, date(2024, 1, 1)),
            Err(ChoreError::Io(_))
        ));
        assert!(matches!(p.add_member(member("Ana")), Err(ChoreError::Io(_))));
        assert!(matches!(p.remove_task(&t.id), Err(ChoreError::Io(_))));
        assert_eq!(p.state(), &before);
        assert!(!p.task(&t.id).unwrap().is_completed_on(date(2024, 1, 1)));
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let mut p = planner();
        assert!(matches!(p.remove_task("x"), Err(ChoreError::UnknownTask(_))));
        assert!(matches!(p.remove_member("x"), Err(ChoreError::UnknownMember(_))));
        assert!(matches!(
            p.toggle_completion("x", date(2024, 1, 1)),
            Err(ChoreError::UnknownTask(_))
        ));
        let mut new = NewTask::new("Dishes", date(2024, 1, 1));
        new.assignee_id = Some("ghost".to_string());
        assert!(matches!(p.add_task(new), Err(ChoreError::UnknownMember(_))));
        assert_eq!(p.store().saves(), 0);
    }

    #[test]
    fn test_remove_member_unassigns() {
        let mut p = planner();
        let m = p.add_member(member("Ana")).unwrap();
        let mut new = NewTask::new("Dishes", date(2024, 1, 1));
        new.assignee_id = Some(m.id.clone());
        let t = p.add_task(new).unwrap();
        p.remove_member(&m.id).unwrap();
        assert_eq!(p.task(&t.id).unwrap().assignee_id, None);
    }

    #[test]
    fn test_set_recurrence_anchors_on_start_date() {
        let mut p = planner();
        let t = p.add_task(NewTask::new("Budget review", date(2024, 1, 10))).unwrap();
        let config = RecurrenceConfig::every(Frequency::Monthly, 1)
            .with_monthly_type(MonthlyType::DayOfWeek);
        let rule = p.set_recurrence(&t.id, &config).unwrap();
        assert_eq!(rule.as_deref(), Some("FREQ=MONTHLY;INTERVAL=1;BYDAY=2WE"));

        let window = CalendarWindow::new(date(2024, 1, 1), date(2024, 3, 31));
        assert_eq!(
            p.occurrences(&t.id, &window).unwrap(),
            vec![date(2024, 1, 10), date(2024, 2, 14), date(2024, 3, 13)]
        );

        p.set_recurrence(&t.id, &RecurrenceConfig::default()).unwrap();
        assert!(!p.task(&t.id).unwrap().is_recurring());
    }

    #[test]
    fn test_toggle_completion_reports_state() {
        let mut p = planner();
        let t = p.add_task(NewTask::new("Dishes", date(2024, 1, 1))).unwrap();
        assert!(p.toggle_completion(&t.id, date(2024, 1, 1)).unwrap());
        assert!(!p.toggle_completion(&t.id, date(2024, 1, 1)).unwrap());
    }

    #[test]
    fn test_reopen_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chores.json");
        let id = {
            let mut p = Planner::open(JsonFileStore::new(&path)).unwrap();
            p.add_task(NewTask::new("Dishes", date(2024, 1, 1))).unwrap().id
        };
        let p = Planner::open(JsonFileStore::new(&path)).unwrap();
        assert_eq!(p.task(&id).unwrap().title, "Dishes");
        let window = CalendarWindow::new(date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(p.events(&window).len(), 1);
    }
}
