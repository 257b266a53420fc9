//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::DecodedArtifact;
use crate::error::DecodeError;
use crate::models::PdfConfig;

/// PDF decoder with a bounded page count.
///
/// The page cap bounds latency on malformed or huge files; an unreadable
/// PDF surfaces as an explicit [`DecodeError`], never a silent empty string.
pub struct PdfDecoder {
    max_pages: usize,
}

impl PdfDecoder {
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            max_pages: config.max_pages,
        }
    }

    /// Extract text from the first `max_pages` pages of a PDF.
    pub fn decode(&self, data: &[u8]) -> Result<DecodedArtifact, DecodeError> {
        let doc = Document::load_mem(data).map_err(|e| DecodeError::PdfParse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(DecodeError::Encrypted);
        }

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(DecodeError::NoPages);
        }

        let page_numbers: Vec<u32> = pages.keys().copied().take(self.max_pages).collect();
        if page_numbers.len() < pages.len() {
            debug!(
                "PDF has {} pages, extracting first {}",
                pages.len(),
                page_numbers.len()
            );
        }

        let text = doc
            .extract_text(&page_numbers)
            .or_else(|_| {
                // Some generators defeat lopdf's content-stream walk; retry
                // with pdf-extract before giving up.
                pdf_extract::extract_text_from_mem(data)
                    .map_err(|e| DecodeError::TextExtraction(e.to_string()))
            })?;

        debug!("extracted {} chars from {} pages", text.len(), page_numbers.len());

        Ok(DecodedArtifact::from_text(text))
    }
}

impl Default for PdfDecoder {
    fn default() -> Self {
        Self::new(&PdfConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_bytes_error() {
        let decoder = PdfDecoder::default();
        let result = decoder.decode(b"this is not a pdf");
        assert!(matches!(
            result,
            Err(DecodeError::PdfParse(_)) | Err(DecodeError::NoPages)
        ));
    }

    #[test]
    fn test_empty_input_error() {
        let decoder = PdfDecoder::default();
        assert!(decoder.decode(&[]).is_err());
    }
}
