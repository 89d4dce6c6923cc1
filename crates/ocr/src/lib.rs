pub mod extract;
pub mod hash;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod types;

pub use extract::Extractor;
pub use hash::{export_path, sha256_bytes, to_hex};
pub use pipeline::{OcrResult, PipelineError, SdsPipeline};
pub use preprocess::{normalize, prepare_for_ocr_from_bytes, PreprocessError};
pub use recognizer::{
    backend_from_config, EngineKind, MockRecognizer, OcrBackend, OcrError, TesseractCli,
    TesseractConfig,
};
pub use types::RawDocumentText;
