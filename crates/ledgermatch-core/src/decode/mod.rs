//! Format decoders: PDF, HTML, and scanned images to extractable text.

pub mod html;
pub mod ocr;
pub mod pdf;

pub use html::HtmlDecoder;
pub use ocr::{OcrEngine, OcrHandle, OcrOutcome};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pdf::PdfDecoder;

use chrono::NaiveDate;

use crate::extract::LabeledAmounts;

/// The decoded form of one raw document: plain text plus the structured
/// accessors the HTML decoder can provide. Transient, produced per document
/// and discarded after parsing.
#[derive(Debug, Clone, Default)]
pub struct DecodedArtifact {
    /// Derived plain text.
    pub text: String,

    /// Tables as rows of cell text (HTML only).
    pub tables: Vec<Vec<Vec<String>>>,

    /// Labeled monetary values found in the text (HTML only).
    pub amounts: LabeledAmounts,

    /// Normalizable dates in source order, duplicates removed (HTML only).
    pub dates: Vec<NaiveDate>,

    /// Order/invoice number substring, if present (HTML only).
    pub order_number: Option<String>,

    /// Card suffix substring, if present (HTML only).
    pub card_last4: Option<String>,

    /// Engine confidence when the text came from OCR.
    pub ocr_confidence: Option<f32>,
}

impl DecodedArtifact {
    /// Wrap already-plain text with no structured accessors.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Whether the artifact carries no usable text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
