use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to read capture from {source_name}: {err}")]
    Read {
        source_name: String,
        err: std::io::Error,
    },
    #[cfg(feature = "clipboard")]
    #[error("Failed to read image from clipboard: {0}")]
    Clipboard(String),
}

/// Where a captured image comes from.
pub trait CaptureSource {
    /// Encoded image bytes, or `None` when no image is available.
    fn capture(&mut self) -> Result<Option<Vec<u8>>, CaptureError>;
}

/// An image file on disk. A missing or empty file means no image.
pub struct FileCapture {
    path: PathBuf,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CaptureSource for FileCapture {
    fn capture(&mut self) -> Result<Option<Vec<u8>>, CaptureError> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let bytes = std::fs::read(&self.path).map_err(|err| CaptureError::Read {
            source_name: self.path.display().to_string(),
            err,
        })?;
        Ok(Some(bytes).filter(|b| !b.is_empty()))
    }
}

/// Image bytes piped on standard input, e.g. from a clipboard tool.
/// An interactive terminal or an empty stream means no image.
pub struct StdinCapture;

impl CaptureSource for StdinCapture {
    fn capture(&mut self) -> Result<Option<Vec<u8>>, CaptureError> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Ok(None);
        }
        let mut bytes = Vec::new();
        stdin
            .lock()
            .read_to_end(&mut bytes)
            .map_err(|err| CaptureError::Read { source_name: "stdin".to_string(), err })?;
        Ok(Some(bytes).filter(|b| !b.is_empty()))
    }
}

/// The image currently on the system clipboard, re-encoded as PNG.
/// Text or an empty clipboard means no image.
#[cfg(feature = "clipboard")]
pub struct ClipboardCapture;

#[cfg(feature = "clipboard")]
impl CaptureSource for ClipboardCapture {
    fn capture(&mut self) -> Result<Option<Vec<u8>>, CaptureError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| CaptureError::Clipboard(e.to_string()))?;
        let data = match clipboard.get_image() {
            Ok(data) => data,
            Err(arboard::Error::ContentNotAvailable) => return Ok(None),
            Err(e) => return Err(CaptureError::Clipboard(e.to_string())),
        };
        tracing::debug!(width = data.width, height = data.height, "clipboard image");
        encode_rgba(data.width, data.height, data.bytes.into_owned()).map(Some)
    }
}

#[cfg(feature = "clipboard")]
fn encode_rgba(width: usize, height: usize, rgba: Vec<u8>) -> Result<Vec<u8>, CaptureError> {
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(CaptureError::Clipboard(format!("image too large: {width}x{height}")));
    };
    let img = image::RgbaImage::from_raw(w, h, rgba).ok_or_else(|| {
        CaptureError::Clipboard(format!("pixel buffer does not match {width}x{height}"))
    })?;
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| CaptureError::Clipboard(e.to_string()))?;
    Ok(png)
}
