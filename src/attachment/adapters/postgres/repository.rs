//! `PostgreSQL` repository implementation for attachment records.

use super::models::AttachmentRow;
use crate::attachment::{
    domain::{
        Attachment, AttachmentId, AttachmentOwner, Checksum, PersistedAttachmentData, StoredName,
    },
    ports::{AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult},
};
use crate::identity::domain::UserId;
use crate::store::postgres::{WorkboardPgPool, blocking::run_with_connection, schema::attachments};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed attachment repository.
///
/// The table has no foreign key to projects or tasks, so records outlive
/// their owners.
#[derive(Debug, Clone)]
pub struct PostgresAttachmentRepository {
    pool: WorkboardPgPool,
}

impl PostgresAttachmentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkboardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AttachmentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AttachmentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_with_connection(&self.pool, f, AttachmentRepositoryError::Persistence).await
    }
}

#[async_trait]
impl AttachmentRepository for PostgresAttachmentRepository {
    async fn store(&self, attachment: &Attachment) -> AttachmentRepositoryResult<()> {
        let row = to_row(attachment)?;
        let attachment_id = attachment.id();

        self.run_blocking(move |connection| {
            diesel::insert_into(attachments::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AttachmentRepositoryError::DuplicateAttachment(attachment_id)
                    }
                    _ => AttachmentRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(attachments::table.find(id.into_inner()))
                .execute(connection)
                .map_err(AttachmentRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(AttachmentRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: AttachmentId) -> AttachmentRepositoryResult<Option<Attachment>> {
        self.run_blocking(move |connection| {
            let row = attachments::table
                .find(id.into_inner())
                .select(AttachmentRow::as_select())
                .first::<AttachmentRow>(connection)
                .optional()
                .map_err(AttachmentRepositoryError::persistence)?;
            row.map(row_to_attachment).transpose()
        })
        .await
    }

    async fn list_for_owner(
        &self,
        owner: AttachmentOwner,
    ) -> AttachmentRepositoryResult<Vec<Attachment>> {
        self.run_blocking(move |connection| {
            attachments::table
                .filter(attachments::owner_type.eq(owner.owner_type()))
                .filter(attachments::owner_id.eq(owner.owner_id()))
                .order((attachments::created_at.asc(), attachments::id.asc()))
                .select(AttachmentRow::as_select())
                .load::<AttachmentRow>(connection)
                .map_err(AttachmentRepositoryError::persistence)?
                .into_iter()
                .map(row_to_attachment)
                .collect()
        })
        .await
    }
}

fn to_row(attachment: &Attachment) -> AttachmentRepositoryResult<AttachmentRow> {
    let owner = attachment.owner();
    Ok(AttachmentRow {
        id: attachment.id().into_inner(),
        owner_type: owner.owner_type().to_owned(),
        owner_id: owner.owner_id(),
        name: attachment.stored_name().as_str().to_owned(),
        original_name: attachment.original_name().to_owned(),
        path: attachment.path().to_owned(),
        size: i64::try_from(attachment.size()).map_err(AttachmentRepositoryError::persistence)?,
        mime_type: attachment.mime_type().to_owned(),
        checksum: attachment.checksum().as_str().to_owned(),
        uploaded_by: attachment.uploaded_by().into_inner(),
        created_at: attachment.created_at(),
    })
}

fn row_to_attachment(row: AttachmentRow) -> AttachmentRepositoryResult<Attachment> {
    let AttachmentRow {
        id,
        owner_type,
        owner_id,
        name,
        original_name,
        path,
        size,
        mime_type,
        checksum,
        uploaded_by,
        created_at,
    } = row;

    let data = PersistedAttachmentData {
        id: AttachmentId::from_uuid(id),
        owner: AttachmentOwner::from_parts(&owner_type, owner_id)
            .map_err(AttachmentRepositoryError::invalid_persisted_data)?,
        stored_name: StoredName::from_persisted(name),
        original_name,
        path,
        size: u64::try_from(size).map_err(AttachmentRepositoryError::invalid_persisted_data)?,
        mime_type,
        checksum: Checksum::from_persisted(checksum),
        uploaded_by: UserId::from_uuid(uploaded_by),
        created_at,
    };
    Ok(Attachment::from_persisted(data))
}
