//! Validated text value objects for task titles and descriptions.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum title length, matching the `VARCHAR(200)` storage column.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Validated task title.
///
/// Titles must be non-blank and at most [`MAX_TITLE_LENGTH`] characters. The
/// value is stored as supplied; uniqueness compares [`TaskTitle::normalized`]
/// keys instead.
///
/// # Examples
///
///     use taskgate::task::domain::TaskTitle;
///
///     let title = TaskTitle::new("Write Report").expect("valid");
///     assert_eq!(title.normalized(), "write report");
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for blank values and
    /// [`TaskDomainError::TitleTooLong`] when the character count exceeds
    /// [`MAX_TITLE_LENGTH`].
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let actual = raw.chars().count();
        if actual > MAX_TITLE_LENGTH {
            return Err(TaskDomainError::TitleTooLong {
                max: MAX_TITLE_LENGTH,
                actual,
            });
        }
        Ok(Self(raw))
    }

    /// Returns the title as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the case-folded key used for uniqueness comparisons.
    #[must_use]
    pub fn normalized(&self) -> String {
        normalize_title(&self.0)
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case-folds a raw title for case-insensitive comparison.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase()
}

/// Validated, non-blank task description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] for blank values.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        Ok(Self(raw))
    }

    /// Returns the description text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length in Unicode scalar values.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
