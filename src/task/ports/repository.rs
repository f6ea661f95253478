//! Repository port for task persistence and title lookup.

use crate::task::domain::{NewTask, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns it with its assigned identifier.
    ///
    /// Implementations check and insert the normalized title as one atomic
    /// step, so a concurrent writer with the same title cannot slip in
    /// between a caller's lookup and this call.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTitle`] when a task with a
    /// case-insensitively equal title already exists.
    async fn create(&self, task: NewTask) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Finds a task whose title equals `title` ignoring letter case.
    ///
    /// Returns `None` when no stored title matches.
    async fn find_by_title_ignore_case(&self, title: &str) -> TaskRepositoryResult<Option<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with a case-insensitively equal title already exists.
    #[error("duplicate task title: {0}")]
    DuplicateTitle(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
