//! Error types for chore-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChoreError {
    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Unknown team member: {0}")]
    UnknownMember(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed data file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChoreError>;
