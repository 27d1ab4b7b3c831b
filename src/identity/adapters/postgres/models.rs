//! Diesel row models for user persistence.

use crate::store::postgres::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// PHC-encoded password hash.
    pub password_hash: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Active flag.
    pub is_active: bool,
    /// JSON array of role labels.
    pub roles: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for user records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub struct UserWriteRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// PHC-encoded password hash.
    pub password_hash: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Active flag.
    pub is_active: bool,
    /// JSON array of role labels.
    pub roles: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
