//! Application services linking uploaded files to projects and tasks.

mod linkage;

pub use linkage::{
    AttachmentService, AttachmentServiceError, AttachmentServiceResult, UploadedFile,
};
