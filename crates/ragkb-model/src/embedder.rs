//! HTTP embedding client.

use async_trait::async_trait;
use ragkb_core::{Embedder, ModelError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::client::ProviderClient;

/// Embeddings endpoint path (OpenAI-compatible).
const EMBEDDINGS_PATH: &str = "/v1/embeddings";

/// Embedder backed by a remote provider endpoint.
pub struct HttpEmbedder {
    client: Arc<ProviderClient>,
    model: String,
    dimension: usize,
}

impl HttpEmbedder {
    /// Create a new HTTP embedder over a shared provider client.
    #[must_use]
    pub fn new(client: Arc<ProviderClient>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            client,
            model: model.into(),
            dimension,
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ModelError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("embedding batch of {}", texts.len());

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let response: EmbeddingResponse =
            self.client.post_json(EMBEDDINGS_PATH, &request).await?;

        if response.data.len() != texts.len() {
            return Err(ModelError::Response(format!(
                "provider returned {} embeddings for {} inputs",
                response.data.len(),
                texts.len()
            )));
        }

        let mut data = response.data;
        data.sort_by_key(|entry| entry.index);
        Ok(data.into_iter().map(|entry| entry.embedding).collect())
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}
