//! Data models for receipts, configuration, and sync state.

pub mod config;
pub mod receipt;

pub use config::{EngineConfig, MatchConfig, OcrConfig, PdfConfig, SyncConfig};
pub use receipt::{
    Confidence, OriginKind, ParsedReceipt, Receipt, ReceiptLineItem, SyncStatus,
};
