//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The title exceeds the storage column width.
    #[error("task title has {actual} characters, limit is {max}")]
    TitleTooLong {
        /// Maximum accepted number of characters.
        max: usize,
        /// Number of characters supplied.
        actual: usize,
    },

    /// The description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,
}

/// Error returned while parsing task status labels.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
