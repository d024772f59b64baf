//! Planner state and the pure reducer that evolves it.

use serde::{Deserialize, Serialize};

use crate::task::{Task, TeamMember};

/// Everything the planner persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppState {
    pub team_members: Vec<TeamMember>,
    #[serde(alias = "chores")]
    pub tasks: Vec<Task>,
}

impl AppState {
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn member(&self, id: &str) -> Option<&TeamMember> {
        self.team_members.iter().find(|m| m.id == id)
    }
}

/// A state change. Serialized as `{"type": "...", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AddMember(TeamMember),
    UpdateMember(TeamMember),
    /// Removes the member and unassigns their tasks.
    DeleteMember(String),
    #[serde(alias = "ADD_CHORE")]
    AddTask(Task),
    #[serde(alias = "UPDATE_CHORE")]
    UpdateTask(Task),
    #[serde(alias = "DELETE_CHORE")]
    DeleteTask(String),
    #[serde(alias = "TOGGLE_CHORE_COMPLETION", rename_all = "camelCase")]
    ToggleCompletion {
        #[serde(alias = "choreId")]
        task_id: String,
        date: String,
    },
    LoadState(AppState),
}

/// Apply `action` to `state`.
///
/// Updates and toggles that name an unknown id return the state unchanged.
///
/// # Examples
///
/// ```
/// use chore_engine::state::{reduce, Action, AppState};
///
/// let state = reduce(AppState::default(), Action::DeleteTask("missing".into()));
/// assert_eq!(state, AppState::default());
/// ```
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::AddMember(member) => state.team_members.push(member),
        Action::UpdateMember(member) => {
            match state.team_members.iter_mut().find(|m| m.id == member.id) {
                Some(slot) => *slot = member,
                None => log::debug!("update for unknown member {}", member.id),
            }
        }
        Action::DeleteMember(id) => {
            state.team_members.retain(|m| m.id != id);
            for task in &mut state.tasks {
                if task.assignee_id.as_deref() == Some(id.as_str()) {
                    task.assignee_id = None;
                }
            }
        }
        Action::AddTask(task) => state.tasks.push(task),
        Action::UpdateTask(task) => match state.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => log::debug!("update for unknown task {}", task.id),
        },
        Action::DeleteTask(id) => state.tasks.retain(|t| t.id != id),
        Action::ToggleCompletion { task_id, date } => {
            match state.tasks.iter_mut().find(|t| t.id == task_id) {
                Some(task) => {
                    task.toggle_completion(&date);
                }
                None => log::debug!("completion toggle for unknown task {task_id}"),
            }
        }
        Action::LoadState(loaded) => return loaded,
    }
    state
}

// ── Tests ───────────────────────────────────────────────────────────────────
