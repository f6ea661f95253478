//! Individual task creation rules.
//!
//! Each rule is a pure check over the raw payload or an already-validated
//! field. Ordering and error selection live in the creation service.

use crate::task::domain::TaskDescription;
use regex::Regex;
use serde_json::{Map, Value};

/// Payload keys that must be present before any other rule runs.
pub const REQUIRED_FIELDS: [&str; 3] = ["title", "description", "status"];

/// Returns `true` when every key in [`REQUIRED_FIELDS`] is present.
///
/// Presence only: a key mapped to `null` or a non-string still counts.
#[must_use]
pub fn has_required_fields(payload: &Map<String, Value>) -> bool {
    REQUIRED_FIELDS
        .iter()
        .all(|field| payload.contains_key(*field))
}

/// Pattern-based predicate for titles that must be refused.
#[derive(Debug, Clone)]
pub struct SpecialTitlePolicy {
    pattern: Regex,
}

impl SpecialTitlePolicy {
    /// Compiles the policy from a regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] when the pattern is not a valid expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns `true` when `title` matches the special-title pattern.
    #[must_use]
    pub fn is_special(&self, title: &str) -> bool {
        self.pattern.is_match(title)
    }

    /// Returns the source pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Returns `true` when the description has at least `min_length` characters.
#[must_use]
pub fn meets_min_description_length(description: &TaskDescription, min_length: usize) -> bool {
    description.char_count() >= min_length
}
