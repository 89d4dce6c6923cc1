use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

use crate::types::RawDocumentText;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract library not available — build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR backend.
/// Implementations accept PNG image bytes and return the recognized text.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<RawDocumentText, OcrError>;
}

impl<T: OcrBackend + ?Sized> OcrBackend for Box<T> {
    fn recognize(&self, image_bytes: &[u8]) -> Result<RawDocumentText, OcrError> {
        (**self).recognize(image_bytes)
    }
}

/// Which engine binding to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Spawn the `tesseract` executable.
    #[default]
    Cli,
    /// Link libtesseract through `leptess`.
    Library,
}

/// Engine settings, passed in at construction so separate recognizers can
/// point at separate installations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TesseractConfig {
    pub engine: EngineKind,
    /// Executable to spawn for [`EngineKind::Cli`].
    pub binary: PathBuf,
    pub lang: String,
    /// Page segmentation mode (`--psm`); the engine default when unset.
    pub psm: Option<u8>,
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Cli,
            binary: PathBuf::from("tesseract"),
            lang: "eng".to_string(),
            psm: None,
            tessdata_dir: None,
        }
    }
}

/// Build the recognizer selected by `config.engine`.
pub fn backend_from_config(config: &TesseractConfig) -> Result<Box<dyn OcrBackend>, OcrError> {
    match config.engine {
        EngineKind::Cli => Ok(Box::new(TesseractCli::new(config.clone()))),
        #[cfg(feature = "tesseract")]
        EngineKind::Library => Ok(Box::new(tesseract_backend::TesseractRecognizer::new(
            config.tessdata_dir.as_ref().map(|p| p.to_string_lossy().into_owned()),
            &config.lang,
        ))),
        #[cfg(not(feature = "tesseract"))]
        EngineKind::Library => Err(OcrError::NotAvailable),
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string, for exercising the extraction pipeline
/// without an OCR engine installed.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<RawDocumentText, OcrError> {
        Ok(RawDocumentText::new(self.text.clone()))
    }
}

// ── Tesseract command-line backend ────────────────────────────────────────────

/// Drives the `tesseract` executable, reading the text back from stdout.
pub struct TesseractCli {
    config: TesseractConfig,
}

impl TesseractCli {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    fn command(&self, input: &std::path::Path) -> Command {
        let mut cmd = Command::new(&self.config.binary);
        cmd.arg(input).arg("stdout").arg("-l").arg(&self.config.lang);
        if let Some(psm) = self.config.psm {
            cmd.arg("--psm").arg(psm.to_string());
        }
        if let Some(dir) = &self.config.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd
    }
}

impl OcrBackend for TesseractCli {
    fn recognize(&self, image_bytes: &[u8]) -> Result<RawDocumentText, OcrError> {
        let tmpdir = tempfile::TempDir::with_prefix("tesseract")
            .map_err(|e| OcrError::Engine(format!("cannot create temp dir: {e}")))?;
        let input_path = tmpdir.path().join("input.png");
        std::fs::write(&input_path, image_bytes)
            .map_err(|e| OcrError::Engine(format!("cannot write tesseract input file: {e}")))?;

        tracing::debug!(binary = %self.config.binary.display(), lang = %self.config.lang, "running tesseract");
        let output = self.command(&input_path).output().map_err(|e| {
            OcrError::Engine(format!("cannot run {}: {e}", self.config.binary.display()))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "{} exited with {}: {}",
                self.config.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(RawDocumentText::new(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}

// ── Tesseract library backend (optional, gated behind `tesseract` feature) ────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use crate::types::RawDocumentText;
    use leptess::LepTess;

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<RawDocumentText, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text()
                .map(RawDocumentText::new)
                .map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}
