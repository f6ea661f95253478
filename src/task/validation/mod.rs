//! Task payload validation.
//!
//! [`schema`] maps the wire object to typed fields the way a serializer
//! would, [`rules`] holds the individual creation rules, and [`config`]
//! carries their tunable parameters.

pub mod config;
pub mod rules;
pub mod schema;

pub use config::TaskValidationConfig;
pub use rules::{REQUIRED_FIELDS, SpecialTitlePolicy, has_required_fields};
pub use schema::{FieldErrors, TaskFields, non_blank_string_field, parse_task_fields};
