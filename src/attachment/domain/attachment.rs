//! Attachment record.

use super::{AttachmentId, AttachmentOwner, FileKind, StoredName};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Lowercase hex SHA-256 digest of stored content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Computes the digest of `content`.
    #[must_use]
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Wraps a digest read back from persistence.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Facts about stored content needed to create a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    /// Owning project or task.
    pub owner: AttachmentOwner,
    /// Generated storage name.
    pub stored_name: StoredName,
    /// Name supplied by the uploader.
    pub original_name: String,
    /// Storage path returned by the storage port.
    pub path: String,
    /// Content length in bytes.
    pub size: u64,
    /// Detected content kind.
    pub kind: FileKind,
    /// Digest of the stored content.
    pub checksum: Checksum,
    /// Uploading user.
    pub uploaded_by: UserId,
}

/// Uploaded file linked to a project or task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    id: AttachmentId,
    #[serde(flatten)]
    owner: AttachmentOwner,
    #[serde(rename = "name")]
    stored_name: StoredName,
    original_name: String,
    path: String,
    size: u64,
    mime_type: String,
    checksum: Checksum,
    uploaded_by: UserId,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAttachmentData {
    /// Persisted identifier.
    pub id: AttachmentId,
    /// Persisted owner.
    pub owner: AttachmentOwner,
    /// Persisted storage name.
    pub stored_name: StoredName,
    /// Persisted original name.
    pub original_name: String,
    /// Persisted storage path.
    pub path: String,
    /// Persisted size in bytes.
    pub size: u64,
    /// Persisted mime type.
    pub mime_type: String,
    /// Persisted checksum.
    pub checksum: Checksum,
    /// Persisted uploader.
    pub uploaded_by: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    /// Creates a record for freshly stored content.
    #[must_use]
    pub fn new(data: NewAttachment, clock: &impl Clock) -> Self {
        Self {
            id: AttachmentId::new(),
            owner: data.owner,
            stored_name: data.stored_name,
            original_name: data.original_name,
            path: data.path,
            size: data.size,
            mime_type: data.kind.mime_type().to_owned(),
            checksum: data.checksum,
            uploaded_by: data.uploaded_by,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAttachmentData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            stored_name: data.stored_name,
            original_name: data.original_name,
            path: data.path,
            size: data.size,
            mime_type: data.mime_type,
            checksum: data.checksum,
            uploaded_by: data.uploaded_by,
            created_at: data.created_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> AttachmentId {
        self.id
    }

    /// Returns the owner.
    #[must_use]
    pub const fn owner(&self) -> AttachmentOwner {
        self.owner
    }

    /// Returns the storage name.
    #[must_use]
    pub const fn stored_name(&self) -> &StoredName {
        &self.stored_name
    }

    /// Returns the uploader-supplied name.
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Returns the storage path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the content length in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the detected mime type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the content checksum.
    #[must_use]
    pub const fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    /// Returns the uploading user.
    #[must_use]
    pub const fn uploaded_by(&self) -> UserId {
        self.uploaded_by
    }

    /// Returns the upload timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
