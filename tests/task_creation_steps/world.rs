//! Shared world state for task creation BDD scenarios.

use std::sync::Arc;

use rstest::fixture;
use serde_json::{Map, Value};
use taskgate::{
    auth::domain::{Identity, UserId},
    task::{
        adapters::memory::InMemoryTaskRepository,
        domain::Task,
        services::{TaskCreationError, TaskCreationService},
        validation::TaskValidationConfig,
    },
};

/// Service type used by the BDD world.
pub type TestCreationService = TaskCreationService<InMemoryTaskRepository>;

/// Scenario world for task creation behaviour tests.
pub struct TaskCreationWorld {
    /// The creation service under test.
    pub service: TestCreationService,
    /// Caller submitting candidates.
    pub caller: Identity,
    /// Candidate payload built by the given steps.
    pub pending_payload: Option<Map<String, Value>>,
    /// Result of the last submission.
    pub last_result: Option<Result<Task, TaskCreationError>>,
}

impl TaskCreationWorld {
    /// Creates a world backed by an empty repository.
    ///
    /// # Panics
    ///
    /// Panics if the default validation config is rejected.
    #[must_use]
    pub fn new() -> Self {
        let service = TaskCreationService::new(
            Arc::new(InMemoryTaskRepository::new()),
            &TaskValidationConfig::default(),
        )
        .expect("default validation config is valid");
        Self {
            service,
            caller: Identity::new(UserId::new(1)),
            pending_payload: None,
            last_result: None,
        }
    }
}

impl Default for TaskCreationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskCreationWorld {
    TaskCreationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a candidate payload from string fields.
pub fn candidate(title: &str, description: &str, status: &str) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("title".to_owned(), Value::from(title));
    payload.insert("description".to_owned(), Value::from(description));
    payload.insert("status".to_owned(), Value::from(status));
    payload
}
