//! Tunable parameters for the task creation rules.

use serde::{Deserialize, Serialize};

/// Default special-title pattern: the first non-whitespace character is ASCII
/// punctuation.
pub const DEFAULT_SPECIAL_TITLE_PATTERN: &str = r"^\s*[[:punct:]]";

/// Default minimum description length in characters.
pub const DEFAULT_MIN_DESCRIPTION_LENGTH: usize = 20;

/// Configuration for the task creation rules.
///
/// # Examples
///
/// ```
/// use taskgate::task::validation::TaskValidationConfig;
///
/// let config = TaskValidationConfig::default();
/// assert_eq!(config.min_description_length, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskValidationConfig {
    /// Regular expression that classifies a title as special.
    pub special_title_pattern: String,
    /// Minimum number of characters in a description.
    pub min_description_length: usize,
}

impl Default for TaskValidationConfig {
    fn default() -> Self {
        Self {
            special_title_pattern: DEFAULT_SPECIAL_TITLE_PATTERN.to_owned(),
            min_description_length: DEFAULT_MIN_DESCRIPTION_LENGTH,
        }
    }
}
