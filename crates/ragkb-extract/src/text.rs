//! Plain-text and markdown extractor.

use async_trait::async_trait;
use ragkb_core::{DocumentExtractor, ExtractError};
use std::path::Path;
use tokio::fs;

/// Extractor for plain text and markdown files.
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new text extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for TextExtractor {
    fn extensions(&self) -> &[&str] {
        &["txt", "md"]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExtractError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(ExtractError::Io(e)),
        }
    }
}
