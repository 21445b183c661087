//! Retrieval engine: the tool surface over the pipeline components.

use ragkb_core::{
    CollectionStats, DocumentChunk, EmbeddedChunk, Embedder, GenerationParams, Generator,
    HealthReport, IndexReport, IndexStatus, ModelError, OpReport, QueryResponse, Result,
    SearchHit, SearchResponse, SourceRef, VectorStore,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::processor::DocumentProcessor;
use crate::prompt::{build_rag_prompt, join_context, NO_MATCH_ANSWER};

/// Retrieval defaults applied when the caller does not override them.
#[derive(Debug, Clone)]
pub struct QueryDefaults {
    pub top_k: usize,
    pub score_threshold: f32,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            top_k: 5,
            score_threshold: 0.7,
        }
    }
}

/// Composes extractor, chunker, embedder, store and generator into the
/// index-time and query-time pipelines.
///
/// Components are injected once at construction and shared for the process
/// lifetime; concurrent calls share no per-request state.
pub struct RagEngine {
    processor: DocumentProcessor,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    store: Arc<dyn VectorStore>,
    defaults: QueryDefaults,
    generation: GenerationParams,
}

impl RagEngine {
    /// Create a new engine over the given components.
    pub fn new(
        processor: DocumentProcessor,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        store: Arc<dyn VectorStore>,
        defaults: QueryDefaults,
        generation: GenerationParams,
    ) -> Self {
        Self {
            processor,
            embedder,
            generator,
            store,
            defaults,
            generation,
        }
    }

    /// Index a single document: extract → chunk → embed → store.
    ///
    /// A document with no extractable content reports `no_content` with a
    /// zero count instead of failing.
    pub async fn index_document(&self, path: &Path) -> Result<IndexReport> {
        info!("indexing document {:?}", path);

        let chunks = self.processor.process_file(path).await?;
        if chunks.is_empty() {
            return Ok(IndexReport {
                status: IndexStatus::NoContent,
                chunks_indexed: 0,
                message: "no content extracted from document".to_string(),
            });
        }

        let count = self.embed_and_store(&chunks).await?;
        info!("indexed {count} chunks from {:?}", path);
        Ok(IndexReport {
            status: IndexStatus::Success,
            chunks_indexed: count,
            message: "document indexed successfully".to_string(),
        })
    }

    /// Index every supported file under a directory.
    ///
    /// Files are processed independently; one file failing is logged and
    /// skipped without aborting the batch.
    pub async fn index_directory(&self, path: &Path, recursive: bool) -> Result<IndexReport> {
        let files = self.processor.collect_files(path, recursive).await?;
        info!("found {} files to index under {:?}", files.len(), path);

        let mut total_chunks = 0u64;
        let mut indexed_files = 0usize;
        for file in &files {
            match self.index_single(file).await {
                Ok(count) => {
                    total_chunks += count;
                    if count > 0 {
                        indexed_files += 1;
                    }
                }
                Err(e) => warn!("skipping {:?}: {e}", file),
            }
        }

        if total_chunks == 0 {
            return Ok(IndexReport {
                status: IndexStatus::NoContent,
                chunks_indexed: 0,
                message: "no documents found or processed".to_string(),
            });
        }

        Ok(IndexReport {
            status: IndexStatus::Success,
            chunks_indexed: total_chunks,
            message: format!("indexed {indexed_files} documents"),
        })
    }

    async fn index_single(&self, path: &Path) -> Result<u64> {
        let chunks = self.processor.process_file(path).await?;
        if chunks.is_empty() {
            return Ok(0);
        }
        self.embed_and_store(&chunks).await
    }

    async fn embed_and_store(&self, chunks: &[DocumentChunk]) -> Result<u64> {
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(ModelError::Response(format!(
                "{} embeddings for {} chunks",
                vectors.len(),
                chunks.len()
            ))
            .into());
        }

        let records: Vec<EmbeddedChunk> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| EmbeddedChunk {
                id: chunk.id.clone(),
                text: chunk.text.clone(),
                source: chunk.source.clone(),
                vector,
            })
            .collect();

        // Chunk ids are deterministic per (source, index); deleting them
        // first makes re-indexing an upsert instead of a duplicate.
        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        self.store.delete(&ids).await?;
        self.store.insert(&records).await?;

        Ok(records.len() as u64)
    }

    /// Answer a question grounded in retrieved context.
    ///
    /// With no hit at or above the score threshold, a fixed informational
    /// answer is returned and the generator is never invoked.
    pub async fn query(
        &self,
        text: &str,
        top_k: Option<usize>,
        include_sources: bool,
    ) -> Result<QueryResponse> {
        info!("processing query: {text}");

        let hits = self.retrieve(text, top_k).await?;
        if hits.is_empty() {
            return Ok(QueryResponse {
                answer: NO_MATCH_ANSWER.to_string(),
                context: Vec::new(),
                sources: include_sources.then(Vec::new),
            });
        }

        let context_texts: Vec<String> = hits.iter().map(|h| h.text.clone()).collect();
        let context = join_context(&context_texts);
        let prompt = build_rag_prompt(text, &context);
        let answer = self.generator.generate(&prompt, &self.generation).await?;

        let sources = include_sources.then(|| {
            hits.iter()
                .map(|hit| SourceRef {
                    source: hit.source.clone(),
                    score: hit.score,
                    chunk_id: hit.id.clone(),
                })
                .collect()
        });

        info!("query answered from {} retrieved chunks", hits.len());
        Ok(QueryResponse {
            answer,
            context: context_texts,
            sources,
        })
    }

    /// Raw ranked retrieval, no generation.
    pub async fn search(&self, text: &str, top_k: Option<usize>) -> Result<SearchResponse> {
        let hits = self.retrieve(text, top_k).await?;
        Ok(SearchResponse {
            query: text.to_string(),
            count: hits.len(),
            results: hits,
        })
    }

    async fn retrieve(&self, text: &str, top_k: Option<usize>) -> Result<Vec<SearchHit>> {
        let vector = self.embedder.embed_one(text).await?;
        let k = top_k.unwrap_or(self.defaults.top_k);
        let hits = self
            .store
            .search(&vector, k, self.defaults.score_threshold)
            .await?;
        Ok(hits)
    }

    /// Collection statistics.
    pub async fn stats(&self) -> Result<CollectionStats> {
        Ok(self.store.stats().await?)
    }

    /// Drop all indexed data. Not reversible.
    pub async fn clear(&self) -> Result<OpReport> {
        warn!("clearing knowledge base");
        self.store.clear().await?;
        Ok(OpReport::success("knowledge base cleared successfully"))
    }

    /// Probe embedder and store.
    pub async fn health(&self) -> HealthReport {
        HealthReport {
            embedder: self.embedder.health_check().await,
            store: self.store.health_check().await,
        }
    }
}
