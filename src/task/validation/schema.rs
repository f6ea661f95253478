//! Schema-level mapping from the wire object to typed task fields.
//!
//! This is the serializer layer: it checks JSON types, blank values and the
//! title length, and reports every failing field with its messages. Status
//! membership is left to the creation chain.

use crate::task::domain::{TaskDescription, TaskDomainError, TaskTitle};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const REQUIRED_MESSAGE: &str = "This field is required.";
const NULL_MESSAGE: &str = "This field may not be null.";
const NOT_A_STRING_MESSAGE: &str = "Not a valid string.";
const BLANK_MESSAGE: &str = "This field may not be blank.";

/// Field-level schema errors keyed by field name.
///
/// Serializes as `{"<field>": ["<message>", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Appends a message for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Returns the messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns `true` when no field has failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Typed fields produced by a successful schema check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    /// Validated title.
    pub title: TaskTitle,
    /// Validated description.
    pub description: TaskDescription,
    /// Raw status label, not yet checked against the status set.
    pub status_label: String,
}

/// Maps the wire object to [`TaskFields`].
///
/// # Errors
///
/// Returns [`FieldErrors`] holding every failing field when any of `title`,
/// `description` or `status` is missing, `null`, not a string, or (for title
/// and description) blank, or when the title is longer than
/// [`MAX_TITLE_LENGTH`](crate::task::domain::MAX_TITLE_LENGTH) characters.
pub fn parse_task_fields(payload: &Map<String, Value>) -> Result<TaskFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = string_field(payload, "title", &mut errors)
        .and_then(|raw| record(&mut errors, "title", TaskTitle::new(raw)));
    let description = string_field(payload, "description", &mut errors)
        .and_then(|raw| record(&mut errors, "description", TaskDescription::new(raw)));
    let status_label = string_field(payload, "status", &mut errors).map(str::to_owned);

    match (title, description, status_label) {
        (Some(title), Some(description), Some(status_label)) if errors.is_empty() => {
            Ok(TaskFields {
                title,
                description,
                status_label,
            })
        }
        _ => Err(errors),
    }
}

/// Reads a required, non-blank string from `payload`.
///
/// Records the same messages as [`parse_task_fields`] under `field` and
/// returns `None` on failure. Used for payloads other than tasks.
pub fn non_blank_string_field<'a>(
    payload: &'a Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    let value = string_field(payload, field, errors)?;
    if value.trim().is_empty() {
        errors.push(field, BLANK_MESSAGE);
        return None;
    }
    Some(value)
}

fn string_field<'a>(
    payload: &'a Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    match payload.get(field) {
        None => {
            errors.push(field, REQUIRED_MESSAGE);
            None
        }
        Some(Value::Null) => {
            errors.push(field, NULL_MESSAGE);
            None
        }
        Some(Value::String(value)) => Some(value.as_str()),
        Some(_) => {
            errors.push(field, NOT_A_STRING_MESSAGE);
            None
        }
    }
}

fn record<T>(
    errors: &mut FieldErrors,
    field: &str,
    result: Result<T, TaskDomainError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(field, domain_error_message(&err));
            None
        }
    }
}

fn domain_error_message(err: &TaskDomainError) -> String {
    match err {
        TaskDomainError::EmptyTitle | TaskDomainError::EmptyDescription => {
            BLANK_MESSAGE.to_owned()
        }
        TaskDomainError::TitleTooLong { max, .. } => {
            format!("Ensure this field has no more than {max} characters.")
        }
    }
}
