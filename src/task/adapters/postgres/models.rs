//! Diesel row models for task persistence.

use crate::store::postgres::schema::tasks;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// First scheduled day.
    pub start_date: NaiveDate,
    /// Last scheduled day.
    pub end_date: NaiveDate,
    /// Status label.
    pub status: String,
    /// Parent project.
    pub project_id: uuid::Uuid,
    /// Assigned user.
    pub assigned_user_id: uuid::Uuid,
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskWriteRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// First scheduled day.
    pub start_date: NaiveDate,
    /// Last scheduled day.
    pub end_date: NaiveDate,
    /// Status label.
    pub status: String,
    /// Parent project.
    pub project_id: uuid::Uuid,
    /// Assigned user.
    pub assigned_user_id: uuid::Uuid,
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
