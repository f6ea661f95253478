//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{NewTask, Task, TaskId, normalize_title},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Identifiers are assigned sequentially starting at 1. Title uniqueness is
/// enforced through a normalized-title index updated under the same write
/// lock as the insert.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    title_index: HashMap<String, TaskId>,
    last_id: u64,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: NewTask) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;

        let key = task.title().normalized();
        if state.title_index.contains_key(&key) {
            return Err(TaskRepositoryError::DuplicateTitle(
                task.title().as_str().to_owned(),
            ));
        }

        state.last_id += 1;
        let id = TaskId::new(state.last_id);
        let stored = task.into_task(id);
        state.title_index.insert(key, id);
        state.tasks.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_title_ignore_case(&self, title: &str) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let task = state
            .title_index
            .get(&normalize_title(title))
            .and_then(|id| state.tasks.get(id))
            .cloned();
        Ok(task)
    }
}
