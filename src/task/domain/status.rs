//! Closed set of task status labels.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task progress status.
///
/// The wire and storage representation is the upper-case label returned by
/// [`TaskStatus::as_str`]. Matching is exact: `"todo"` is not a valid label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Work has not started.
    #[serde(rename = "TODO")]
    Todo,
    /// Work is underway.
    #[serde(rename = "INPROGRESS")]
    InProgress,
    /// Work is finished.
    #[serde(rename = "DONE")]
    Done,
}

impl TaskStatus {
    /// Every accepted status, in declaration order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the canonical wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "INPROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Returns the human-readable name of the status.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
