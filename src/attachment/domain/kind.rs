//! Accepted upload kinds and content sniffing.

use serde::{Deserialize, Serialize};

const PDF_MAGIC: &[u8] = b"%PDF-";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const DOCX_MARKER: &[u8] = b"word/";

/// Kind of file accepted as an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// PDF document.
    Pdf,
    /// Legacy Word document (OLE compound file).
    Doc,
    /// Word document (Office Open XML).
    Docx,
    /// JPEG image.
    Jpeg,
}

impl FileKind {
    /// Detects the kind from leading content bytes.
    ///
    /// Returns `None` when the content matches no accepted kind. A ZIP
    /// archive counts as a Word document only when it carries a `word/`
    /// part.
    #[must_use]
    pub fn detect(content: &[u8]) -> Option<Self> {
        if content.starts_with(PDF_MAGIC) {
            return Some(Self::Pdf);
        }
        if content.starts_with(JPEG_MAGIC) {
            return Some(Self::Jpeg);
        }
        if content.starts_with(OLE_MAGIC) {
            return Some(Self::Doc);
        }
        if content.starts_with(ZIP_MAGIC)
            && content
                .windows(DOCX_MARKER.len())
                .any(|window| window == DOCX_MARKER)
        {
            return Some(Self::Docx);
        }
        None
    }

    /// Returns the mime type recorded for the kind.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Returns the extension used when the original name has no usable one.
    #[must_use]
    pub const fn canonical_extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Jpeg => "jpg",
        }
    }

    /// Returns `true` when `extension` (lowercase) is conventional for the
    /// kind.
    #[must_use]
    pub fn accepts_extension(self, extension: &str) -> bool {
        match self {
            Self::Jpeg => matches!(extension, "jpg" | "jpeg"),
            other => extension == other.canonical_extension(),
        }
    }
}
