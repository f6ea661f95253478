//! Domain model for task records.
//!
//! The task domain holds validated task values and keeps persistence and
//! transport concerns outside of the domain boundary.

mod error;
mod ids;
mod status;
mod task;
mod text;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use status::TaskStatus;
pub use task::{NewTask, PersistedTaskData, Task};
pub use text::{MAX_TITLE_LENGTH, TaskDescription, TaskTitle, normalize_title};
