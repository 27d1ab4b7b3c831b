//! Domain model for file attachments.

mod attachment;
mod error;
mod ids;
mod kind;
mod name;
mod owner;
mod upload;

pub use attachment::{Attachment, Checksum, NewAttachment, PersistedAttachmentData};
pub use error::{AttachmentDomainError, ParseOwnerTypeError};
pub use ids::AttachmentId;
pub use kind::FileKind;
pub use name::StoredName;
pub use owner::AttachmentOwner;
pub use upload::{MAX_ORIGINAL_NAME_CHARS, inspect_upload};
