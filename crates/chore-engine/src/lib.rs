//! # chore-engine
//!
//! Recurrence and planning engine for a shared chore calendar.
//!
//! Tasks repeat according to RFC 5545 RRULE strings. The engine builds those
//! strings from a small form-shaped configuration, expands them into concrete
//! dates inside a visible window, describes them in plain English, and reads
//! them back into the configuration for editing. Around that sit the task and
//! member model, a pure reducer, calendar event building, and JSON persistence.
//!
//! ## Modules
//!
//! - [`config`]: the form-shaped recurrence configuration
//! - [`rule`]: typed RRULE grammar with canonical formatting
//! - [`builder`]: configuration → rule string
//! - [`expander`]: rule string → dates within a window
//! - [`describe`]: rule string → English phrase
//! - [`parser`]: rule string → configuration
//! - [`window`]: the visible calendar range
//! - [`task`], [`state`]: tasks, members, and the reducer
//! - [`calendar`], [`colors`]: coloured per-date events
//! - [`due`]: counts of upcoming and overdue occurrences
//! - [`store`], [`planner`]: persistence and the mutation entry point
//! - [`dates`]: calendar-date helpers
//! - [`error`]: error types

pub mod builder;
pub mod calendar;
pub mod colors;
pub mod config;
pub mod dates;
pub mod describe;
pub mod due;
pub mod error;
pub mod expander;
pub mod parser;
pub mod planner;
pub mod rule;
pub mod state;
pub mod store;
pub mod task;
pub mod window;

pub use builder::config_to_rule;
pub use calendar::{build_events, CalendarEvent};
pub use config::{Frequency, MonthlyType, RecurrenceConfig};
pub use describe::describe;
pub use due::{due_summary, DueSummary};
pub use error::{ChoreError, Result};
pub use expander::expand;
pub use parser::parse_rule;
pub use planner::Planner;
pub use rule::RecurrenceRule;
pub use state::{reduce, Action, AppState};
pub use store::{JsonFileStore, MemoryStore, TaskStore};
pub use task::{NewMember, NewTask, Region, Task, TeamMember};
pub use window::{CalendarWindow, WindowConfig};
