//! Configuration structures for the reconciliation engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the ledgermatch pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Transaction matching configuration.
    pub matching: MatchConfig,

    /// PDF decoding configuration.
    pub pdf: PdfConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Sync defaults.
    pub sync: SyncConfig,
}

/// Transaction matcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Candidate window around the receipt date, in days each direction.
    pub window_days: i64,

    /// Minimum candidate score required to accept a match. Below this the
    /// engine prefers creating a new expense over risking a wrong match.
    pub accept_threshold: i32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            window_days: 3,
            accept_threshold: 80,
        }
    }
}

/// PDF decoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to extract text from. Bounds latency on malformed or
    /// oversized files.
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { max_pages: 10 }
    }
}

/// OCR configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Recognition results below this confidence are treated as
    /// "no usable text" rather than an error.
    pub min_confidence: f32,

    /// Directory containing OCR model files.
    pub model_dir: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.40,
            model_dir: PathBuf::from("models"),
        }
    }
}

/// Defaults applied when building receipts for sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Job/project receipts bill to when no assignment is known.
    pub default_job: String,

    /// Expense category used when no vendor profile supplies one.
    pub default_category: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_job: "Unassigned".to_string(),
            default_category: "Job Materials".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.matching.window_days, 3);
        assert_eq!(config.matching.accept_threshold, 80);
        assert_eq!(config.pdf.max_pages, 10);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"matching": {"window_days": 5}}"#).unwrap();
        assert_eq!(config.matching.window_days, 5);
        assert_eq!(config.matching.accept_threshold, 80);
    }
}
