//! Attaching, listing and deleting files on projects and tasks.

use crate::access::{AccessError, Actor, policy};
use crate::attachment::{
    domain::{
        Attachment, AttachmentId, AttachmentOwner, Checksum, FileKind, NewAttachment, StoredName,
        inspect_upload,
    },
    ports::{AttachmentRepository, AttachmentRepositoryError, FileStorage, FileStorageError},
};
use crate::config::UploadConfig;
use crate::project::ports::{ProjectRepository, ProjectRepositoryError};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use crate::validation::FieldErrors;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const FILE_FIELD: &str = "file";

/// One uploaded file as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name the uploader gave the file.
    pub original_name: String,
    /// Raw content.
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Creates an upload from its name and content.
    #[must_use]
    pub fn new(original_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            original_name: original_name.into(),
            content: content.into(),
        }
    }
}

/// Service-level errors for attachment operations.
#[derive(Debug, Error)]
pub enum AttachmentServiceError {
    /// An upload failed validation.
    #[error(transparent)]
    Validation(FieldErrors),
    /// The actor may not perform the operation.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// The owning project or task does not exist.
    #[error("attachment owner not found: {0}")]
    OwnerNotFound(AttachmentOwner),
    /// The attachment does not exist.
    #[error("attachment not found: {0}")]
    NotFound(AttachmentId),
    /// Attachment repository operation failed.
    #[error(transparent)]
    Repository(AttachmentRepositoryError),
    /// Byte storage failed.
    #[error(transparent)]
    Storage(#[from] FileStorageError),
    /// Project lookup failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

impl From<AttachmentRepositoryError> for AttachmentServiceError {
    fn from(err: AttachmentRepositoryError) -> Self {
        match err {
            AttachmentRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for attachment service operations.
pub type AttachmentServiceResult<T> = Result<T, AttachmentServiceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OwnerAccess {
    View,
    Attach,
}

/// Upload that passed every check, ready to store.
struct CheckedUpload {
    original_name: String,
    content: Vec<u8>,
    kind: FileKind,
}

/// Attachment linkage orchestration service.
#[derive(Clone)]
pub struct AttachmentService<A, S, P, T, C>
where
    A: AttachmentRepository,
    S: FileStorage,
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    attachments: Arc<A>,
    storage: Arc<S>,
    projects: Arc<P>,
    tasks: Arc<T>,
    clock: Arc<C>,
    max_file_size_bytes: u64,
}

impl<A, S, P, T, C> AttachmentService<A, S, P, T, C>
where
    A: AttachmentRepository,
    S: FileStorage,
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new attachment service enforcing the upload limits in
    /// `uploads`.
    #[must_use]
    pub const fn new(
        attachments: Arc<A>,
        storage: Arc<S>,
        projects: Arc<P>,
        tasks: Arc<T>,
        clock: Arc<C>,
        uploads: &UploadConfig,
    ) -> Self {
        Self {
            attachments,
            storage,
            projects,
            tasks,
            clock,
            max_file_size_bytes: uploads.max_file_size_bytes,
        }
    }

    /// Stores one file and links it to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentServiceError::OwnerNotFound`],
    /// [`AttachmentServiceError::Access`] or
    /// [`AttachmentServiceError::Validation`] (field `file`), checked in
    /// that order.
    pub async fn attach(
        &self,
        actor: &Actor,
        owner: AttachmentOwner,
        file: UploadedFile,
    ) -> AttachmentServiceResult<Attachment> {
        policy::ensure_active(actor)?;
        self.authorize_owner(actor, owner, OwnerAccess::Attach).await?;

        let mut errors = FieldErrors::new();
        let checked = self.check(&mut errors, FILE_FIELD, file);
        let Some(upload) = checked else {
            return Err(reject(errors));
        };

        let attachment = self.store_one(actor, owner, upload).await?;
        info!(
            actor = %actor.user_id(),
            owner = %owner,
            attachment_id = %attachment.id(),
            size = attachment.size(),
            "file attached"
        );
        Ok(attachment)
    }

    /// Stores several files and links them all to `owner`.
    ///
    /// Every file is checked before any is stored; one invalid file rejects
    /// the batch with errors keyed `files.<index>`. When storing fails part
    /// way, files already stored by this call are removed again.
    ///
    /// # Errors
    ///
    /// As [`Self::attach`].
    pub async fn attach_all(
        &self,
        actor: &Actor,
        owner: AttachmentOwner,
        files: Vec<UploadedFile>,
    ) -> AttachmentServiceResult<Vec<Attachment>> {
        policy::ensure_active(actor)?;
        self.authorize_owner(actor, owner, OwnerAccess::Attach).await?;

        let mut errors = FieldErrors::new();
        let checked: Vec<Option<CheckedUpload>> = files
            .into_iter()
            .enumerate()
            .map(|(index, file)| self.check(&mut errors, &format!("files.{index}"), file))
            .collect();
        if !errors.is_empty() {
            return Err(reject(errors));
        }

        let mut stored = Vec::with_capacity(checked.len());
        for upload in checked.into_iter().flatten() {
            match self.store_one(actor, owner, upload).await {
                Ok(attachment) => stored.push(attachment),
                Err(err) => {
                    warn!(owner = %owner, stored = stored.len(), "bulk attach failed, undoing");
                    self.undo(&stored).await;
                    return Err(err);
                }
            }
        }

        info!(
            actor = %actor.user_id(),
            owner = %owner,
            count = stored.len(),
            "files attached"
        );
        Ok(stored)
    }

    /// Returns the attachments of an owner the actor may see, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentServiceError::OwnerNotFound`] or
    /// [`AttachmentServiceError::Access`].
    pub async fn list_for_owner(
        &self,
        actor: &Actor,
        owner: AttachmentOwner,
    ) -> AttachmentServiceResult<Vec<Attachment>> {
        policy::ensure_active(actor)?;
        self.authorize_owner(actor, owner, OwnerAccess::View).await?;
        Ok(self.attachments.list_for_owner(owner).await?)
    }

    /// Deletes an attachment record and its stored bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentServiceError::NotFound`] for unknown identifiers
    /// and [`AttachmentServiceError::Access`] unless the actor is an
    /// administrator or the uploader.
    pub async fn delete(&self, actor: &Actor, id: AttachmentId) -> AttachmentServiceResult<()> {
        policy::ensure_active(actor)?;
        let attachment = self
            .attachments
            .find_by_id(id)
            .await?
            .ok_or(AttachmentServiceError::NotFound(id))?;
        policy::authorize_attachment_delete(actor, &attachment).inspect_err(log_refusal)?;

        self.attachments.delete(id).await?;
        self.storage
            .remove(attachment.stored_name())
            .await
            .inspect_err(|err| {
                warn!(attachment_id = %id, error = %err, "stored bytes not removed");
            })?;
        info!(actor = %actor.user_id(), attachment_id = %id, "attachment deleted");
        Ok(())
    }

    async fn authorize_owner(
        &self,
        actor: &Actor,
        owner: AttachmentOwner,
        access: OwnerAccess,
    ) -> AttachmentServiceResult<()> {
        let outcome = match owner {
            AttachmentOwner::Project(id) => {
                let project = self
                    .projects
                    .find_by_id(id)
                    .await?
                    .ok_or(AttachmentServiceError::OwnerNotFound(owner))?;
                match access {
                    OwnerAccess::View => policy::authorize_project_view(actor, &project),
                    OwnerAccess::Attach => policy::authorize_project_attach(actor, &project),
                }
            }
            AttachmentOwner::Task(id) => {
                let task = self
                    .tasks
                    .find_by_id(id)
                    .await?
                    .ok_or(AttachmentServiceError::OwnerNotFound(owner))?;
                let members = self
                    .projects
                    .find_by_id(task.project_id())
                    .await?
                    .map(|project| project.members().clone())
                    .unwrap_or_default();
                match access {
                    OwnerAccess::View => policy::authorize_task_view(actor, &task, &members),
                    OwnerAccess::Attach => policy::authorize_task_attach(actor, &task, &members),
                }
            }
        };
        outcome.inspect_err(log_refusal)?;
        Ok(())
    }

    fn check(
        &self,
        errors: &mut FieldErrors,
        field: &str,
        file: UploadedFile,
    ) -> Option<CheckedUpload> {
        let kind = errors.capture(
            field,
            inspect_upload(&file.original_name, &file.content, self.max_file_size_bytes),
        )?;
        Some(CheckedUpload {
            original_name: file.original_name.trim().to_owned(),
            content: file.content,
            kind,
        })
    }

    async fn store_one(
        &self,
        actor: &Actor,
        owner: AttachmentOwner,
        upload: CheckedUpload,
    ) -> AttachmentServiceResult<Attachment> {
        let stored_name = StoredName::generate(upload.kind, &upload.original_name);
        let path = self.storage.put(&stored_name, &upload.content).await?;
        let attachment = Attachment::new(
            NewAttachment {
                owner,
                stored_name,
                size: u64::try_from(upload.content.len()).unwrap_or(u64::MAX),
                checksum: Checksum::of(&upload.content),
                original_name: upload.original_name,
                path,
                kind: upload.kind,
                uploaded_by: actor.user_id(),
            },
            &*self.clock,
        );

        if let Err(err) = self.attachments.store(&attachment).await {
            self.discard(attachment.stored_name()).await;
            return Err(err.into());
        }
        Ok(attachment)
    }

    async fn undo(&self, stored: &[Attachment]) {
        for attachment in stored {
            if let Err(err) = self.attachments.delete(attachment.id()).await {
                warn!(attachment_id = %attachment.id(), error = %err, "record not rolled back");
            }
            self.discard(attachment.stored_name()).await;
        }
    }

    async fn discard(&self, name: &StoredName) {
        if let Err(err) = self.storage.remove(name).await {
            warn!(name = %name, error = %err, "orphaned stored file");
        }
    }
}

fn log_refusal(err: &AccessError) {
    if let AccessError::Forbidden { user_id, action } = err {
        debug!(actor = %user_id, action = %action, "attachment access refused");
    }
}

fn reject(errors: FieldErrors) -> AttachmentServiceError {
    debug!(fields = %errors, "upload rejected");
    AttachmentServiceError::Validation(errors)
}
