//! PDF text extractor.

use async_trait::async_trait;
use ragkb_core::{DocumentExtractor, ExtractError};
use std::path::Path;
use tracing::debug;

/// Extractor for PDF files.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        debug!("extracting pdf {:?}", path);

        let bytes = match tokio::fs::read(path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ExtractError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(ExtractError::Io(e)),
        };

        // pdf-extract parses synchronously; keep it off the async threads.
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| ExtractError::Failed(format!("task join error: {e}")))?
        .map_err(|e| ExtractError::Failed(format!("pdf parse error: {e}")))?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn handles_pdf_extension() {
        let extractor = PdfExtractor::new();
        assert!(extractor.can_extract(Path::new("/docs/report.pdf")));
        assert!(extractor.can_extract(Path::new("/docs/REPORT.PDF")));
        assert!(!extractor.can_extract(Path::new("/docs/report.txt")));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let extractor = PdfExtractor::new();
        let err = extractor
            .extract(Path::new("/nonexistent/report.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::NotFound(_)));
    }

    #[tokio::test]
    async fn corrupt_file_is_extraction_failed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let extractor = PdfExtractor::new();
        let err = extractor.extract(&path).await.unwrap_err();
        assert!(matches!(err, ExtractError::Failed(_)));
    }
}
