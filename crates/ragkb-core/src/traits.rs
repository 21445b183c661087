//! Core traits for RAGKB components.
//!
//! - [`DocumentExtractor`]: turn a document file into raw text
//! - [`Chunker`]: split normalized text into overlapping chunks
//! - [`Embedder`]: convert text into fixed-dimension vectors
//! - [`Generator`]: produce an answer from a grounded prompt
//! - [`VectorStore`]: persist and search embedded chunks
//!
//! The traits keep the pipeline pluggable: every stage is injected into its
//! consumer as an `Arc<dyn ...>`, so providers and storage engines can be
//! swapped without touching the orchestration.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{ExtractError, ModelError, StoreError};
use crate::types::{
    CollectionStats, EmbeddedChunk, GenerationParams, SearchHit,
};

// ============================================================================
// Extraction
// ============================================================================

/// Trait for extracting text from document files.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// File extensions this extractor handles, lowercase, without the dot.
    fn extensions(&self) -> &[&str];

    /// Check whether this extractor handles the given file.
    fn can_extract(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext.to_lowercase().as_str()))
    }

    /// Extract the raw text content of a file, in document order.
    async fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

// ============================================================================
// Chunking
// ============================================================================

/// Trait for splitting text into chunks.
///
/// Chunking is CPU-bound and synchronous; it runs inline in the caller's
/// async flow.
pub trait Chunker: Send + Sync {
    /// Split text into ordered chunk texts.
    fn chunk(&self, text: &str) -> Vec<String>;
}

// ============================================================================
// Embedding
// ============================================================================

/// Trait for generating embeddings.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts. Position-preserving: vector `i` corresponds
    /// to text `i`.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ModelError>;

    /// Embed a single text.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let vectors = self.embed(&[text]).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Response("empty embedding result".to_string()))
    }

    /// Probe the provider with a one-element call and check the returned
    /// vector length against the configured dimension.
    async fn health_check(&self) -> bool {
        match self.embed_one("health check").await {
            Ok(vector) => vector.len() == self.dimension(),
            Err(_) => false,
        }
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Trait for grounded text generation.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the prompt.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ModelError>;
}

// ============================================================================
// Vector storage
// ============================================================================

/// Trait for vector storage and similarity search over one collection.
///
/// Implementations own the persisted records; chunks and vectors handed in
/// are consumed, stamped with the current Unix timestamp, and never mutated
/// in place afterwards. Inserted records are guaranteed visible to search
/// only once the implementation's flush (durability point) completes, which
/// `insert` awaits before returning.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert records. Every vector length must equal the collection
    /// dimension; a mismatch fails the whole batch with
    /// [`StoreError::DimensionMismatch`].
    async fn insert(&self, records: &[EmbeddedChunk]) -> Result<(), StoreError>;

    /// Return up to `top_k` nearest neighbors, best match first, keeping
    /// only hits on the right side of `score_threshold` for the collection
    /// metric.
    async fn search(
        &self,
        query: &[f32],
        top_k: usize,
        score_threshold: f32,
    ) -> Result<Vec<SearchHit>, StoreError>;

    /// Remove records by id, then flush.
    async fn delete(&self, ids: &[String]) -> Result<(), StoreError>;

    /// Current entity count, metric and dimension.
    async fn stats(&self) -> Result<CollectionStats, StoreError>;

    /// Drop all data and recreate the empty collection with the same
    /// schema. Not reversible.
    async fn clear(&self) -> Result<(), StoreError>;

    /// True iff the collection handle answers a lightweight read.
    async fn health_check(&self) -> bool {
        self.stats().await.is_ok()
    }
}
