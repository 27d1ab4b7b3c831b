//! Diesel row models for attachment persistence.

use crate::store::postgres::schema::attachments;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Attachment record row, used for reads and inserts alike.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = attachments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttachmentRow {
    /// Attachment identifier.
    pub id: uuid::Uuid,
    /// Owner discriminator.
    pub owner_type: String,
    /// Owner identifier.
    pub owner_id: uuid::Uuid,
    /// Generated storage name.
    pub name: String,
    /// Uploader-supplied name.
    pub original_name: String,
    /// Storage path.
    pub path: String,
    /// Size in bytes.
    pub size: i64,
    /// Detected mime type.
    pub mime_type: String,
    /// Hex SHA-256 of the content.
    pub checksum: String,
    /// Uploading user.
    pub uploaded_by: uuid::Uuid,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
}
