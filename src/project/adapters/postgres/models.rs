//! Diesel row models for project persistence.

use crate::store::postgres::schema::{project_members, projects};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
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
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for project records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
pub struct ProjectWriteRow {
    /// Project identifier.
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
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Membership row linking a project to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = project_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MemberRow {
    /// Project.
    pub project_id: uuid::Uuid,
    /// Member user.
    pub user_id: uuid::Uuid,
}
