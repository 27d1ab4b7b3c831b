//! In-memory repository for attachment records.

use crate::attachment::{
    domain::{Attachment, AttachmentId, AttachmentOwner},
    ports::{AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult},
};
use crate::store::InMemoryDatabase;
use crate::store::memory::sort_oldest_first;
use async_trait::async_trait;

/// Attachment repository over the shared [`InMemoryDatabase`].
#[derive(Debug, Clone)]
pub struct InMemoryAttachmentRepository {
    database: InMemoryDatabase,
}

impl InMemoryAttachmentRepository {
    /// Creates a repository over `database`.
    #[must_use]
    pub const fn new(database: InMemoryDatabase) -> Self {
        Self { database }
    }
}

#[async_trait]
impl AttachmentRepository for InMemoryAttachmentRepository {
    async fn store(&self, attachment: &Attachment) -> AttachmentRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(AttachmentRepositoryError::persistence)?;
        if tables.attachments.contains_key(&attachment.id()) {
            return Err(AttachmentRepositoryError::DuplicateAttachment(
                attachment.id(),
            ));
        }
        tables.attachments.insert(attachment.id(), attachment.clone());
        Ok(())
    }

    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(AttachmentRepositoryError::persistence)?;
        tables
            .attachments
            .remove(&id)
            .map(|_| ())
            .ok_or(AttachmentRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: AttachmentId) -> AttachmentRepositoryResult<Option<Attachment>> {
        let tables = self
            .database
            .read()
            .map_err(AttachmentRepositoryError::persistence)?;
        Ok(tables.attachments.get(&id).cloned())
    }

    async fn list_for_owner(
        &self,
        owner: AttachmentOwner,
    ) -> AttachmentRepositoryResult<Vec<Attachment>> {
        let tables = self
            .database
            .read()
            .map_err(AttachmentRepositoryError::persistence)?;
        let mut owned: Vec<Attachment> = tables
            .attachments
            .values()
            .filter(|attachment| attachment.owner() == owner)
            .cloned()
            .collect();
        sort_oldest_first(&mut owned, |attachment| {
            (attachment.created_at(), attachment.id())
        });
        Ok(owned)
    }
}
