//! Error types for attachment domain validation and parsing.

use thiserror::Error;

/// Errors returned while validating uploaded content.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttachmentDomainError {
    /// The upload has no content.
    #[error("the file is empty")]
    EmptyFile,

    /// The upload exceeds the configured size limit.
    #[error("the file may not be larger than {max_kib} kilobytes")]
    TooLarge {
        /// Limit in KiB.
        max_kib: u64,
    },

    /// The content is not one of the accepted kinds.
    #[error("the file must be of type: pdf, doc, docx, jpg, jpeg")]
    UnsupportedKind,

    /// The original file name is blank.
    #[error("the file needs a name")]
    MissingName,

    /// The original file name is longer than the stored column allows.
    #[error("the file name may not be longer than {max} characters")]
    NameTooLong {
        /// Limit in characters.
        max: usize,
    },
}

/// Error returned while parsing a persisted owner type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown attachment owner type: {0}")]
pub struct ParseOwnerTypeError(pub String);
