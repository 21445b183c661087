//! Concurrency-bounded embedder wrapper.

use async_trait::async_trait;
use ragkb_core::{Embedder, ModelError};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Wraps an embedder with a semaphore limiting concurrent provider calls.
///
/// Implements [`Embedder`] itself, so callers hold it behind the same trait
/// object as the wrapped client.
pub struct EmbedderPool {
    inner: Arc<dyn Embedder>,
    semaphore: Semaphore,
    max_concurrent: usize,
}

impl EmbedderPool {
    /// Create a pool allowing `max_concurrent` in-flight embedding calls.
    #[must_use]
    pub fn new(inner: Arc<dyn Embedder>, max_concurrent: usize) -> Self {
        Self {
            inner,
            semaphore: Semaphore::new(max_concurrent),
            max_concurrent,
        }
    }

    /// Permits currently available.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Configured concurrency bound.
    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

#[async_trait]
impl Embedder for EmbedderPool {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ModelError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| ModelError::Unavailable(format!("semaphore closed: {e}")))?;
        self.inner.embed(texts).await
    }
}
