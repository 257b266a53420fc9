//! Error types for the ledgermatch-core library.

use thiserror::Error;

/// Main error type for the reconciliation engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Artifact decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Ledger provider error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Source provider error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Whether this error invalidates every remaining ledger call in the
    /// current batch. Documents after an auth failure are not attempted.
    pub fn aborts_batch(&self) -> bool {
        matches!(self, EngineError::Ledger(LedgerError::Auth(_)))
    }
}

/// Errors raised while decoding a raw document into text.
///
/// A decode error means the artifact was unreadable; the document is skipped
/// and left unmarked at the source so the next cycle can retry it.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Failed to parse the PDF container.
    #[error("failed to parse PDF: {0}")]
    PdfParse(String),

    /// Failed to extract text from an otherwise readable PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The image bytes could not be decoded.
    #[error("unreadable image: {0}")]
    UnreadableImage(String),
}

/// Errors raised by the OCR engine.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// No OCR engine is available in this build.
    #[error("no OCR engine configured")]
    NotConfigured,
}

/// Errors raised by the ledger provider.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Authentication failed; no further ledger call can succeed this run.
    #[error("ledger authentication failed: {0}")]
    Auth(String),

    /// A query failed.
    #[error("ledger query failed: {0}")]
    Query(String),

    /// An entity create failed.
    #[error("failed to create {entity}: {reason}")]
    Create { entity: String, reason: String },

    /// A transaction update failed.
    #[error("failed to update transaction {id}: {reason}")]
    Update { id: String, reason: String },

    /// The ledger has no expense account to fall back to.
    #[error("no expense account available")]
    NoExpenseAccount,
}

/// Errors raised by the source document provider.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to list unprocessed documents.
    #[error("failed to list documents: {0}")]
    List(String),

    /// Failed to fetch a document.
    #[error("failed to fetch document {id}: {reason}")]
    Fetch { id: String, reason: String },

    /// Failed to mark a document as processed.
    #[error("failed to mark document {0} processed")]
    MarkProcessed(String),
}

/// Result type for the reconciliation engine.
pub type Result<T> = std::result::Result<T, EngineError>;
