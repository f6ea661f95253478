//! Task record and the unsaved candidate it is created from.

use super::{TaskDescription, TaskId, TaskStatus, TaskTitle};
use serde::{Deserialize, Serialize};

/// A validated task that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: TaskTitle,
    description: TaskDescription,
    status: TaskStatus,
}

impl NewTask {
    /// Creates a candidate task from validated parts.
    #[must_use]
    pub const fn new(title: TaskTitle, description: TaskDescription, status: TaskStatus) -> Self {
        Self {
            title,
            description,
            status,
        }
    }

    /// Returns the candidate title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the candidate description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the candidate status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Binds the store-assigned identifier, producing the persisted record.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
        }
    }
}

/// Persisted task record.
///
/// Serializes to the wire representation `{id, title, description, status}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: TaskDescription,
    status: TaskStatus,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: TaskDescription,
    /// Persisted status.
    pub status: TaskStatus,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the task status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }
}
