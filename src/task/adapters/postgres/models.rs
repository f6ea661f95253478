//! Diesel row models for task persistence.

use super::schema::tasks;
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Store-assigned task identifier.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub id: i64,
    /// Task title.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub title: String,
    /// Task description.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub description: String,
    /// Status label.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Status label.
    pub status: String,
}
