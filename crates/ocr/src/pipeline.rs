use std::path::Path;
use thiserror::Error;

use msds_core::IngredientRecordSet;

use crate::extract::Extractor;
use crate::hash;
use crate::preprocess;
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::RawDocumentText;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] crate::preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// The result of one capture processing run.
#[derive(Debug)]
pub struct OcrResult {
    /// SHA-256 hex digest of the captured image bytes.
    pub hash_hex: String,
    /// Raw OCR text output.
    pub ocr_text: RawDocumentText,
    /// Product identifier and ingredient rows extracted from the text.
    pub records: IngredientRecordSet,
}

/// Orchestrates: hash → normalize → OCR → extract → assemble.
///
/// Runs synchronously; the recognizer call blocks until the engine returns.
pub struct SdsPipeline<R: OcrBackend> {
    recognizer: R,
}

impl<R: OcrBackend> SdsPipeline<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Process an image file on disk.
    pub fn process_file(&self, path: &Path) -> Result<OcrResult, PipelineError> {
        let bytes = std::fs::read(path)?;
        self.process_bytes(&bytes)
    }

    /// Process encoded image bytes (PNG / JPEG / BMP / …).
    pub fn process_bytes(&self, data: &[u8]) -> Result<OcrResult, PipelineError> {
        let hash_hex = hash::to_hex(&hash::sha256_bytes(data));
        tracing::debug!(%hash_hex, bytes = data.len(), "processing capture");

        let image_bytes = preprocess::prepare_for_ocr_from_bytes(data)?;

        let ocr_text = self.recognizer.recognize(&image_bytes)?;
        if ocr_text.is_blank() {
            tracing::warn!("recognizer returned no text");
        } else {
            tracing::debug!(lines = ocr_text.lines().count(), "text recognized");
        }

        let records = Extractor::extract(&ocr_text);
        tracing::info!(
            product = %records.product,
            rows = records.len(),
            "ingredient table extracted"
        );

        Ok(OcrResult { hash_hex, ocr_text, records })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
