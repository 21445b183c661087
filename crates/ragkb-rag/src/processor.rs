//! Document processing: extract, normalize, chunk.

use ragkb_chunker::{chunk_id, RecursiveChunker};
use ragkb_core::{Chunker, ChunkingConfig, DocumentChunk, Error, Result};
use ragkb_extract::{normalize, ExtractorRegistry};
use std::path::{Path, PathBuf};
use tokio_stream::wrappers::ReadDirStream;
use tokio_stream::StreamExt;
use tracing::{debug, info};

/// Turns document files into embeddable chunks.
pub struct DocumentProcessor {
    extractors: ExtractorRegistry,
    chunker: RecursiveChunker,
}

impl DocumentProcessor {
    /// Create a processor with the standard extractors and the given
    /// chunk sizing. Fails fast on invalid sizing.
    pub fn new(chunking: &ChunkingConfig) -> Result<Self> {
        Ok(Self {
            extractors: ExtractorRegistry::with_defaults(),
            chunker: RecursiveChunker::new(chunking)?,
        })
    }

    /// Whether the file's extension is in the supported set.
    #[must_use]
    pub fn supports(&self, path: &Path) -> bool {
        self.extractors.supports(path)
    }

    /// Extensions the processor will pick up, lowercase.
    #[must_use]
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.extractors.supported_extensions()
    }

    /// Process one file into chunks with stable ids and positions.
    ///
    /// An empty or whitespace-only document yields an empty vec, not an
    /// error.
    pub async fn process_file(&self, path: &Path) -> Result<Vec<DocumentChunk>> {
        let raw = self.extractors.extract(path).await?;
        let cleaned = normalize(&raw);
        let texts = self.chunker.chunk(&cleaned);

        let source = path.display().to_string();
        let total_chunks = texts.len() as u32;
        let chunks = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let chunk_index = i as u32;
                DocumentChunk {
                    id: chunk_id(&source, chunk_index),
                    text,
                    source: source.clone(),
                    chunk_index,
                    total_chunks,
                }
            })
            .collect::<Vec<_>>();

        info!("processed {:?}: {} chunks", path, chunks.len());
        Ok(chunks)
    }

    /// Enumerate supported files under a directory, sorted by path.
    pub async fn collect_files(&self, dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            return Err(Error::Other(format!(
                "directory not found: {}",
                dir.display()
            )));
        }
        if !dir.is_dir() {
            return Err(Error::Other(format!(
                "not a directory: {}",
                dir.display()
            )));
        }

        let mut files = Vec::new();
        self.walk(dir, recursive, &mut files).await?;
        files.sort();
        debug!("found {} supported files under {:?}", files.len(), dir);
        Ok(files)
    }

    async fn walk(
        &self,
        dir: &Path,
        recursive: bool,
        files: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let entries = tokio::fs::read_dir(dir).await?;
        let mut stream = ReadDirStream::new(entries);

        while let Some(entry) = stream.next().await {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                if recursive {
                    Box::pin(self.walk(&path, recursive, files)).await?;
                }
            } else if self.supports(&path) {
                files.push(path);
            }
        }

        Ok(())
    }
}
