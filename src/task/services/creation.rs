//! Service layer for validated task creation.
//!
//! [`TaskCreationService::create`] runs the creation rules in a fixed order
//! and stops at the first failure:
//!
//! 1. required keys are present,
//! 2. the title is not special,
//! 3. the payload passes the schema check,
//! 4. the description is long enough,
//! 5. no stored title matches ignoring case,
//! 6. the status is a known label,
//! 7. the task is stored.

use crate::auth::domain::Identity;
use crate::task::{
    domain::{NewTask, Task, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
    validation::{
        FieldErrors, SpecialTitlePolicy, TaskValidationConfig, has_required_fields,
        parse_task_fields, rules::meets_min_description_length,
    },
};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Reasons a creation request is refused.
#[derive(Debug, Clone, Error)]
pub enum TaskCreationError {
    /// At least one of `title`, `description` or `status` is absent.
    #[error("Missing required fields")]
    MissingRequiredFields,

    /// The title matched the special-title pattern.
    #[error("Special titles are not allowed")]
    SpecialTitle,

    /// The payload failed the schema check.
    #[error("invalid task payload")]
    Schema(FieldErrors),

    /// The description is shorter than the configured minimum.
    #[error("Description must be at least {min_length} characters")]
    DescriptionTooShort {
        /// Configured minimum number of characters.
        min_length: usize,
    },

    /// A stored task already uses the title, ignoring case.
    #[error("A task with a similar title already exists")]
    DuplicateTitle,

    /// The status is not one of the accepted labels.
    #[error("Invalid status value")]
    InvalidStatus,

    /// The repository failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl TaskCreationError {
    /// Returns `true` for refusals caused by the payload or store contents,
    /// as opposed to infrastructure failures.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Repository(_))
    }
}

impl From<TaskRepositoryError> for TaskCreationError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::DuplicateTitle(_) => Self::DuplicateTitle,
            other @ TaskRepositoryError::Persistence(_) => Self::Repository(other),
        }
    }
}

/// Result type for task creation.
pub type TaskCreationResult<T> = Result<T, TaskCreationError>;

/// Task creation orchestration service.
pub struct TaskCreationService<R>
where
    R: TaskRepository + ?Sized,
{
    repository: Arc<R>,
    special_titles: SpecialTitlePolicy,
    min_description_length: usize,
}

impl<R> Clone for TaskCreationService<R>
where
    R: TaskRepository + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            special_titles: self.special_titles.clone(),
            min_description_length: self.min_description_length,
        }
    }
}

impl<R> TaskCreationService<R>
where
    R: TaskRepository + ?Sized,
{
    /// Creates a service with the given rule configuration.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] when the special-title pattern does not
    /// compile.
    pub fn new(repository: Arc<R>, config: &TaskValidationConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            repository,
            special_titles: SpecialTitlePolicy::new(&config.special_title_pattern)?,
            min_description_length: config.min_description_length,
        })
    }

    /// Returns the repository backing this service.
    #[must_use]
    pub const fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Validates `payload` and stores the resulting task.
    ///
    /// Nothing is written unless every rule passes.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule as a [`TaskCreationError`], or
    /// [`TaskCreationError::Repository`] when the store fails.
    pub async fn create(
        &self,
        payload: &Map<String, Value>,
        caller: &Identity,
    ) -> TaskCreationResult<Task> {
        let result = self.validate_and_store(payload).await;
        match &result {
            Ok(task) => info!(
                task_id = task.id().value(),
                user_id = caller.user_id().value(),
                "created task"
            ),
            Err(err) if err.is_rejection() => debug!(
                user_id = caller.user_id().value(),
                reason = %err,
                "rejected task creation"
            ),
            Err(err) => error!(
                user_id = caller.user_id().value(),
                error = %err,
                "task creation failed"
            ),
        }
        result
    }

    async fn validate_and_store(&self, payload: &Map<String, Value>) -> TaskCreationResult<Task> {
        if !has_required_fields(payload) {
            return Err(TaskCreationError::MissingRequiredFields);
        }

        let raw_title = payload.get("title").and_then(Value::as_str);
        if raw_title.is_some_and(|title| self.special_titles.is_special(title)) {
            return Err(TaskCreationError::SpecialTitle);
        }

        let fields = parse_task_fields(payload).map_err(TaskCreationError::Schema)?;

        if !meets_min_description_length(&fields.description, self.min_description_length) {
            return Err(TaskCreationError::DescriptionTooShort {
                min_length: self.min_description_length,
            });
        }

        if self
            .repository
            .find_by_title_ignore_case(fields.title.as_str())
            .await?
            .is_some()
        {
            return Err(TaskCreationError::DuplicateTitle);
        }

        let status = TaskStatus::try_from(fields.status_label.as_str())
            .map_err(|_| TaskCreationError::InvalidStatus)?;

        let task = NewTask::new(fields.title, fields.description, status);
        Ok(self.repository.create(task).await?)
    }
}
