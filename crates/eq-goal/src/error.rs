// error.rs — Error types for goal tracking and save-file handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while tracking goals or persisting them.
///
/// None of these are fatal: every variant leaves the [`GoalManager`]
/// in the state it was in before the failing call.
///
/// [`GoalManager`]: crate::manager::GoalManager
#[derive(Debug, Error)]
pub enum GoalError {
    /// An event was recorded against a 0-based index outside the goal list.
    #[error("invalid goal index {index}: {count} goal(s) tracked")]
    InvalidIndex { index: usize, count: usize },

    /// A 1-based goal number from a caller does not name a goal.
    #[error("no goal #{ordinal}: {count} goal(s) tracked")]
    InvalidOrdinal { ordinal: usize, count: usize },

    /// Recording an event would push the score (or the event's own delta)
    /// past the range of `i64`.
    #[error("recording an event on '{goal}' would overflow the score")]
    ScoreOverflow { goal: String },

    /// The save file to load does not exist.
    #[error("save file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A score line or goal line could not be parsed.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A goal line carries a type tag no variant recognizes (strict loads only).
    #[error("unknown goal type '{tag}' on line {line}")]
    UnknownTypeTag { line: usize, tag: String },

    /// A free-text field contains a character the save format splits on.
    #[error("{field} must not contain {character:?}")]
    ReservedCharacter { field: &'static str, character: char },

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize an event record.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The settings file exists but could not be parsed.
    #[error("invalid config at {}: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },
}

impl GoalError {
    /// Shorthand for building a [`GoalError::MalformedRecord`].
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        GoalError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}
