//! Checks applied to uploaded content before it is stored.

use super::{AttachmentDomainError, FileKind};

/// Bytes per KiB, used when reporting the size limit.
const KIB: u64 = 1024;

/// Longest accepted original file name, in characters.
pub const MAX_ORIGINAL_NAME_CHARS: usize = 255;

/// Checks an upload and returns its detected kind.
///
/// Checks run in order: blank name, name length, empty content, size limit,
/// kind.
///
/// # Errors
///
/// Returns the first [`AttachmentDomainError`] that applies.
pub fn inspect_upload(
    original_name: &str,
    content: &[u8],
    max_file_size_bytes: u64,
) -> Result<FileKind, AttachmentDomainError> {
    if original_name.trim().is_empty() {
        return Err(AttachmentDomainError::MissingName);
    }
    if original_name.trim().chars().count() > MAX_ORIGINAL_NAME_CHARS {
        return Err(AttachmentDomainError::NameTooLong {
            max: MAX_ORIGINAL_NAME_CHARS,
        });
    }
    if content.is_empty() {
        return Err(AttachmentDomainError::EmptyFile);
    }
    let size = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if size > max_file_size_bytes {
        return Err(AttachmentDomainError::TooLarge {
            max_kib: max_file_size_bytes.div_ceil(KIB),
        });
    }
    FileKind::detect(content).ok_or(AttachmentDomainError::UnsupportedKind)
}
