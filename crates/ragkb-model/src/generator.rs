//! HTTP generation client.

use async_trait::async_trait;
use ragkb_core::{GenerationParams, Generator, ModelError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::client::ProviderClient;

/// Completions endpoint path (OpenAI-compatible).
const COMPLETIONS_PATH: &str = "/v1/completions";

/// Generator backed by a remote provider endpoint.
pub struct HttpGenerator {
    client: Arc<ProviderClient>,
    model: String,
}

impl HttpGenerator {
    /// Create a new HTTP generator over a shared provider client.
    #[must_use]
    pub fn new(client: Arc<ProviderClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Model identifier.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ModelError> {
        debug!(
            "generating with max_tokens={} temperature={}",
            params.max_tokens, params.temperature
        );

        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };
        let response: CompletionResponse =
            self.client.post_json(COMPLETIONS_PATH, &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| ModelError::Response("no completion choices returned".to_string()))
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generate_before_init_is_not_initialized() {
        let client = Arc::new(ProviderClient::new("http://localhost:9", None));
        let generator = HttpGenerator::new(client, "test-llm");
        let err = generator
            .generate("prompt", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::NotInitialized));
    }

    #[test]
    fn response_takes_first_choice() {
        let raw = r#"{"choices":[{"text":"first"},{"text":"second"}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].text, "first");
    }

    #[test]
    fn request_serializes_generation_params() {
        let request = CompletionRequest {
            model: "test-llm",
            prompt: "Question: why?",
            max_tokens: 256,
            temperature: 0.2,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"max_tokens\":256"));
        assert!(json.contains("\"temperature\":0.2"));
        assert!(json.contains("Question: why?"));
    }
}
