//! Sync orchestration and the per-cycle pipeline driver.

pub mod runner;
pub mod sync;

pub use runner::{CycleOutcome, ReconcilePipeline};
pub use sync::SyncOrchestrator;
