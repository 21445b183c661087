//! DOCX text extractor.
//!
//! A `.docx` file is a zip archive; the document body lives in
//! `word/document.xml`. Text runs are `<w:t>` elements grouped into
//! `<w:p>` paragraphs.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use ragkb_core::{DocumentExtractor, ExtractError};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Extractor for DOCX files.
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new DOCX extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for DocxExtractor {
    fn extensions(&self) -> &[&str] {
        &["docx"]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        debug!("extracting docx {:?}", path);

        let bytes = match tokio::fs::read(path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ExtractError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(ExtractError::Io(e)),
        };

        tokio::task::spawn_blocking(move || extract_docx_text(&bytes))
            .await
            .map_err(|e| ExtractError::Failed(format!("task join error: {e}")))?
            .map_err(ExtractError::Failed)
    }
}

/// Pull paragraph text out of the document body, non-empty paragraphs
/// joined by a blank line.
fn extract_docx_text(bytes: &[u8]) -> Result<String, String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|e| format!("not a docx archive: {e}"))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| format!("missing document body: {e}"))?
        .read_to_string(&mut xml)
        .map_err(|e| format!("unreadable document body: {e}"))?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"t" => in_text_run = false,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"p" => {
                if !current.trim().is_empty() {
                    paragraphs.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
            Ok(Event::Text(t)) if in_text_run => {
                let run = t.unescape().map_err(|e| format!("bad xml text: {e}"))?;
                current.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("xml parse error: {e}")),
        }
    }

    Ok(paragraphs.join("\n\n"))
}
