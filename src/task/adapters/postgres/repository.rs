//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        NewTask, PersistedTaskData, Task, TaskDescription, TaskId, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

const TITLE_UNIQUE_INDEX: &str = "idx_tasks_title_lower_unique";

const CREATE_TASKS_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_tasks/up.sql");

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool for `database_url` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the pool cannot
    /// establish its initial connections.
    pub fn connect(database_url: &str, pool_size: u32) -> TaskRepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(TaskRepositoryError::persistence)?;
        Ok(Self::new(pool))
    }

    /// Creates the `tasks` table and its title index when missing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the DDL fails.
    pub async fn ensure_schema(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(CREATE_TASKS_SQL)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: NewTask) -> TaskRepositoryResult<Task> {
        let title = task.title().as_str().to_owned();
        let new_row = to_new_row(&task);

        self.run_blocking(move |connection| {
            // The unique index on lower(title) covers writers that land
            // between this check and the insert.
            if find_task_by_title_ignore_case(connection, &title)?.is_some() {
                return Err(TaskRepositoryError::DuplicateTitle(title.clone()));
            }

            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_title_unique_violation(info.as_ref()) =>
                    {
                        TaskRepositoryError::DuplicateTitle(title.clone())
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;

            row_to_task(row)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let key = i64::try_from(id.value()).map_err(TaskRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(key))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_title_ignore_case(&self, title: &str) -> TaskRepositoryResult<Option<Task>> {
        let lookup_title = title.to_owned();
        self.run_blocking(move |connection| {
            let row = find_task_by_title_ignore_case(connection, &lookup_title)?;
            row.map(row_to_task).transpose()
        })
        .await
    }
}

fn to_new_row(task: &NewTask) -> NewTaskRow {
    NewTaskRow {
        title: task.title().as_str().to_owned(),
        description: task.description().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
    }
}

pub(super) fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::new(u64::try_from(id).map_err(TaskRepositoryError::persistence)?),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description: TaskDescription::new(description)
            .map_err(TaskRepositoryError::persistence)?,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
    };
    Ok(Task::from_persisted(data))
}

fn is_title_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == TITLE_UNIQUE_INDEX)
}

fn find_task_by_title_ignore_case(
    connection: &mut PgConnection,
    title: &str,
) -> TaskRepositoryResult<Option<TaskRow>> {
    diesel::sql_query(concat!(
        "SELECT id, title, description, status FROM tasks ",
        "WHERE lower(title) = lower($1) ",
        "LIMIT 1",
    ))
    .bind::<diesel::sql_types::Text, _>(title)
    .get_result::<TaskRow>(connection)
    .optional()
    .map_err(TaskRepositoryError::persistence)
}
