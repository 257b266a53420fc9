//! Source provider seam: where unprocessed receipt documents come from.

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Opaque reference to a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A file carried alongside a source document.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl Attachment {
    /// PDF by extension or magic bytes.
    pub fn is_pdf(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".pdf") || self.content.starts_with(b"%PDF")
    }

    /// Raster image by extension.
    pub fn is_image(&self) -> bool {
        let name = self.file_name.to_lowercase();
        [".png", ".jpg", ".jpeg", ".tiff", ".bmp", ".gif"]
            .iter()
            .any(|ext| name.ends_with(ext))
    }
}

/// One fetched source document.
#[derive(Debug, Clone, Default)]
pub struct SourceDocument {
    /// Sender address (empty when the source has none).
    pub sender: String,
    /// Subject line or document title.
    pub subject: String,
    /// Plain-text body, if any.
    pub text: Option<String>,
    /// HTML body, if any.
    pub html: Option<String>,
    /// Attached files.
    pub attachments: Vec<Attachment>,
}

/// Provider of unprocessed receipt documents.
///
/// Returns are assumed idempotent; a `mark_processed` failure is not fatal
/// to a sync outcome already recorded.
pub trait SourceProvider {
    fn list_unprocessed(&self) -> Result<Vec<DocumentRef>, SourceError>;

    fn fetch(&self, document: &DocumentRef) -> Result<SourceDocument, SourceError>;

    fn mark_processed(&mut self, document: &DocumentRef) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_kind_detection() {
        let pdf = Attachment {
            file_name: "receipt.PDF".to_string(),
            content: Vec::new(),
        };
        assert!(pdf.is_pdf());

        let magic = Attachment {
            file_name: "receipt.bin".to_string(),
            content: b"%PDF-1.7".to_vec(),
        };
        assert!(magic.is_pdf());

        let image = Attachment {
            file_name: "scan.jpeg".to_string(),
            content: Vec::new(),
        };
        assert!(image.is_image());
        assert!(!image.is_pdf());
    }
}
