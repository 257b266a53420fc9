//! OCR seam: engine trait, lazy handle, and the native pure-onnx-ocr engine.

use tracing::{debug, info};

use super::DecodedArtifact;
use crate::error::OcrError;
use crate::models::OcrConfig;

/// Raw OCR result for one image.
#[derive(Debug, Clone)]
pub struct OcrOutcome {
    /// Recognized text, lines in reading order.
    pub text: String,
    /// Engine confidence (0.0 - 1.0).
    pub confidence: f32,
}

/// Trait for OCR engine implementations.
pub trait OcrEngine {
    /// Recognize text in image bytes.
    fn recognize(&self, image: &[u8]) -> Result<OcrOutcome, OcrError>;
}

type EngineFactory = Box<dyn Fn() -> Result<Box<dyn OcrEngine>, OcrError>>;

/// Lazily-initialized OCR engine handle.
///
/// The engine is acquired on first use, reused for the rest of the process,
/// and explicitly released on shutdown. Low-confidence or empty output is a
/// valid, non-fatal outcome that downstream treats as "no usable text".
pub struct OcrHandle {
    engine: Option<Box<dyn OcrEngine>>,
    factory: Option<EngineFactory>,
    min_confidence: f32,
}

impl OcrHandle {
    /// Handle that initializes an engine from `factory` on first use.
    pub fn new(config: &OcrConfig, factory: EngineFactory) -> Self {
        Self {
            engine: None,
            factory: Some(factory),
            min_confidence: config.min_confidence,
        }
    }

    /// Handle with no engine available; every decode reports
    /// [`OcrError::NotConfigured`].
    pub fn disabled() -> Self {
        Self {
            engine: None,
            factory: None,
            min_confidence: 0.0,
        }
    }

    /// Whether the underlying engine has been started.
    pub fn is_started(&self) -> bool {
        self.engine.is_some()
    }

    /// Decode image bytes into an artifact, starting the engine if needed.
    pub fn decode(&mut self, image: &[u8]) -> Result<DecodedArtifact, OcrError> {
        if self.engine.is_none() {
            let factory = self.factory.as_ref().ok_or(OcrError::NotConfigured)?;
            info!("starting OCR engine");
            self.engine = Some(factory()?);
        }

        let engine = self.engine.as_ref().ok_or(OcrError::NotConfigured)?;
        let outcome = engine.recognize(image)?;

        let mut artifact = if outcome.confidence < self.min_confidence {
            debug!(
                "OCR confidence {:.2} below floor {:.2}, treating as no usable text",
                outcome.confidence, self.min_confidence
            );
            DecodedArtifact::default()
        } else {
            DecodedArtifact::from_text(outcome.text)
        };
        artifact.ocr_confidence = Some(outcome.confidence);

        Ok(artifact)
    }

    /// Release the engine. Safe to call when never started.
    pub fn shutdown(&mut self) {
        if self.engine.take().is_some() {
            info!("OCR engine released");
        }
    }
}

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external runtime).
#[cfg(feature = "native")]
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
}

#[cfg(feature = "native")]
impl PureOcrEngine {
    /// Create an engine from model files in a directory.
    pub fn from_dir(model_dir: &std::path::Path) -> Result<Self, OcrError> {
        let det_path = model_dir.join("det.onnx");
        let rec_path = model_dir.join("latin_rec.onnx");
        let dict_path = model_dir.join("latin_dict.txt");

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self { engine })
    }
}

#[cfg(feature = "native")]
impl OcrEngine for PureOcrEngine {
    fn recognize(&self, image: &[u8]) -> Result<OcrOutcome, OcrError> {
        let image = image::load_from_memory(image)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let results = self
            .engine
            .run_from_image(&image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        if results.is_empty() {
            return Ok(OcrOutcome {
                text: String::new(),
                confidence: 0.0,
            });
        }

        let confidence =
            results.iter().map(|r| r.confidence).sum::<f32>() / results.len() as f32;
        let text = results
            .iter()
            .map(|r| r.text.replace("[UNK]", " "))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(OcrOutcome { text, confidence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEngine {
        text: &'static str,
        confidence: f32,
    }

    impl OcrEngine for FixedEngine {
        fn recognize(&self, _image: &[u8]) -> Result<OcrOutcome, OcrError> {
            Ok(OcrOutcome {
                text: self.text.to_string(),
                confidence: self.confidence,
            })
        }
    }

    fn handle(text: &'static str, confidence: f32) -> OcrHandle {
        OcrHandle::new(
            &OcrConfig::default(),
            Box::new(move || Ok(Box::new(FixedEngine { text, confidence }))),
        )
    }

    #[test]
    fn test_lazy_start_and_shutdown() {
        let mut h = handle("TOTAL 12.99", 0.9);
        assert!(!h.is_started());

        let artifact = h.decode(&[0u8]).unwrap();
        assert!(h.is_started());
        assert_eq!(artifact.text, "TOTAL 12.99");
        assert_eq!(artifact.ocr_confidence, Some(0.9));

        h.shutdown();
        assert!(!h.is_started());
    }

    #[test]
    fn test_low_confidence_is_empty_not_error() {
        let mut h = handle("garbled", 0.1);
        let artifact = h.decode(&[0u8]).unwrap();
        assert!(artifact.is_empty());
        assert_eq!(artifact.ocr_confidence, Some(0.1));
    }

    #[test]
    fn test_disabled_handle_errors() {
        let mut h = OcrHandle::disabled();
        assert!(matches!(h.decode(&[0u8]), Err(OcrError::NotConfigured)));
    }
}
