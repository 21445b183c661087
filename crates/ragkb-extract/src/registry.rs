//! Extractor registry for dispatching files to extractors.

use ragkb_core::{DocumentExtractor, ExtractError};
use std::path::Path;
use std::sync::Arc;

use crate::{DocxExtractor, PdfExtractor, TextExtractor};

/// Registry of document extractors, dispatched by file extension.
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn DocumentExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Create a registry with the standard extractors (txt/md, pdf, docx).
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TextExtractor::new());
        registry.register(PdfExtractor::new());
        registry.register(DocxExtractor::new());
        registry
    }

    /// Register an extractor.
    pub fn register<E: DocumentExtractor + 'static>(&mut self, extractor: E) {
        self.extractors.push(Arc::new(extractor));
    }

    /// All supported extensions, lowercase.
    #[must_use]
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.extractors
            .iter()
            .flat_map(|e| e.extensions().iter().copied())
            .collect()
    }

    /// Whether some registered extractor handles the file.
    #[must_use]
    pub fn supports(&self, path: &Path) -> bool {
        self.extractors.iter().any(|e| e.can_extract(path))
    }

    /// Find the extractor for a file.
    #[must_use]
    pub fn get_for_file(&self, path: &Path) -> Option<Arc<dyn DocumentExtractor>> {
        self.extractors
            .iter()
            .find(|e| e.can_extract(path))
            .cloned()
    }

    /// Extract the raw text of a file.
    ///
    /// A missing file fails with `NotFound` before dispatch; an extension
    /// outside the supported set fails with `UnsupportedFormat`.
    pub async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::NotFound(path.display().to_string()));
        }

        let extractor = self.get_for_file(path).ok_or_else(|| {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map_or_else(|| path.display().to_string(), |e| format!(".{e}"));
            ExtractError::UnsupportedFormat(ext)
        })?;

        extractor.extract(path).await
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
