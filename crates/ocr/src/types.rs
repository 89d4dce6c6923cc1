use serde::{Deserialize, Serialize};

/// The full recognizer output for one capture. Line order follows the
/// vertical position of the text in the source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDocumentText {
    text: String,
}

impl RawDocumentText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The text as one newline-delimited string.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Lines split on `\n` only; a trailing `\r` stays attached to its line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
