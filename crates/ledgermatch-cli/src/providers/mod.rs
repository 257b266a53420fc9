//! Local provider implementations backing the CLI: a directory inbox and a
//! single-file JSON ledger.

pub mod dir_source;
pub mod json_ledger;

pub use dir_source::DirSource;
pub use json_ledger::JsonLedger;
