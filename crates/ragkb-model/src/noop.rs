//! Offline no-op model implementations.
//!
//! [`NoopEmbedder`] derives vectors from a content hash, so identical text
//! always embeds identically and exact-text searches score at the top.
//! Useful for tests, development builds and running without a provider.

use async_trait::async_trait;
use ragkb_core::{Embedder, GenerationParams, Generator, ModelError};

/// Deterministic hash-based embedder.
pub struct NoopEmbedder {
    dimension: usize,
}

impl NoopEmbedder {
    /// Create a no-op embedder with the default dimension (384).
    #[must_use]
    pub fn new() -> Self {
        Self { dimension: 384 }
    }

    /// Create a no-op embedder with a custom dimension.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let hash = blake3::hash(text.as_bytes());
        let bytes = hash.as_bytes();
        (0..self.dimension)
            .map(|i| (f32::from(bytes[i % 32]) / 255.0) - 0.5)
            .collect()
    }
}

impl Default for NoopEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for NoopEmbedder {
    fn model_name(&self) -> &str {
        "noop"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ModelError> {
        Ok(texts.iter().map(|text| self.vector_for(text)).collect())
    }
}

/// Generator stand-in for runs without a provider endpoint.
pub struct NoopGenerator;

#[async_trait]
impl Generator for NoopGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, ModelError> {
        Ok("Generation is not configured; see the retrieved context below.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dimension() {
        let embedder = NoopEmbedder::new();
        assert_eq!(embedder.dimension(), 384);
        assert_eq!(embedder.model_name(), "noop");
    }

    #[tokio::test]
    async fn embeddings_are_deterministic() {
        let embedder = NoopEmbedder::with_dimension(64);
        let first = embedder.embed(&["same text"]).await.unwrap();
        let second = embedder.embed(&["same text"]).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn different_texts_embed_differently() {
        let embedder = NoopEmbedder::with_dimension(64);
        let vectors = embedder.embed(&["one text", "another text"]).await.unwrap();
        assert_ne!(vectors[0], vectors[1]);
    }

    #[tokio::test]
    async fn batch_preserves_order_and_dimension() {
        let embedder = NoopEmbedder::with_dimension(32);
        let vectors = embedder.embed(&["a", "b", "c"]).await.unwrap();
        assert_eq!(vectors.len(), 3);
        assert!(vectors.iter().all(|v| v.len() == 32));
        assert_eq!(vectors[1], embedder.embed(&["b"]).await.unwrap()[0]);
    }

    #[tokio::test]
    async fn empty_batch_is_empty() {
        let embedder = NoopEmbedder::new();
        assert!(embedder.embed(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_check_passes() {
        let embedder = NoopEmbedder::with_dimension(16);
        assert!(embedder.health_check().await);
    }

    #[tokio::test]
    async fn noop_generator_returns_notice() {
        let answer = NoopGenerator
            .generate("prompt", &GenerationParams::default())
            .await
            .unwrap();
        assert!(answer.contains("not configured"));
    }
}
