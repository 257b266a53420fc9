//! Core library for receipt reconciliation.
//!
//! This crate provides:
//! - Format decoding (PDF, HTML, scanned images via OCR)
//! - Vendor detection and per-vendor field extraction cascades
//! - A generic fallback parser with confidence scoring
//! - Fuzzy matching of receipts against ledger purchase transactions
//! - A sync state machine and per-cycle pipeline driver

pub mod decode;
pub mod error;
pub mod extract;
pub mod ledger;
pub mod matching;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod source;
pub mod vendor;

#[cfg(test)]
pub(crate) mod testutil;

pub use decode::{DecodedArtifact, HtmlDecoder, OcrEngine, OcrHandle, OcrOutcome, PdfDecoder};
#[cfg(feature = "native")]
pub use decode::PureOcrEngine;
pub use error::{DecodeError, EngineError, LedgerError, OcrError, Result, SourceError};
pub use ledger::{EntityRef, EntityResolver, LedgerProvider, PurchaseCandidate, PurchaseFilter};
pub use matching::{score_candidate, MatchOutcome, TransactionMatcher};
pub use models::{
    Confidence, EngineConfig, OriginKind, ParsedReceipt, Receipt, ReceiptLineItem, SyncStatus,
};
pub use parse::{parse_artifact, GenericParser, VendorParser};
pub use pipeline::{CycleOutcome, ReconcilePipeline, SyncOrchestrator};
pub use source::{Attachment, DocumentRef, SourceDocument, SourceProvider};
pub use vendor::{detect, registry, ReceiptFormat, VendorId, VendorProfile};
