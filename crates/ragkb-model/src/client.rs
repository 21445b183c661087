//! Shared HTTP client for the model provider.

use ragkb_core::ModelError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::retry::RetryPolicy;

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(60);

/// One long-lived connection to the embedding/generation provider, shared
/// by both model surfaces for the process lifetime.
///
/// The handle is built by [`ProviderClient::init`]; any request issued
/// before that fails with [`ModelError::NotInitialized`].
pub struct ProviderClient {
    endpoint: String,
    api_key: Option<String>,
    retry: RetryPolicy,
    inner: RwLock<Option<reqwest::Client>>,
}

impl ProviderClient {
    /// Create an uninitialized client for the given base endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            retry: RetryPolicy::default(),
            inner: RwLock::new(None),
        }
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build the underlying HTTP client. Idempotent.
    pub async fn init(&self) -> Result<(), ModelError> {
        let mut guard = self.inner.write().await;
        if guard.is_some() {
            return Ok(());
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let auth = format!("Bearer {}", key.trim());
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth)
                    .map_err(|e| ModelError::Response(format!("invalid api key: {e}")))?,
            );
        }

        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| ModelError::Unavailable(format!("failed to build http client: {e}")))?;

        *guard = Some(client);
        debug!("provider client initialized for {}", self.endpoint);
        Ok(())
    }

    async fn handle(&self) -> Result<reqwest::Client, ModelError> {
        self.inner
            .read()
            .await
            .clone()
            .ok_or(ModelError::NotInitialized)
    }

    /// POST a JSON body and parse the JSON response, retrying transient
    /// failures per the policy. Exhausted retries surface as
    /// [`ModelError::Unavailable`].
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ModelError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let client = self.handle().await?;
        let url = format!("{}{}", self.endpoint.trim_end_matches('/'), path);

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match client.post(&url).json(body).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return resp
                            .json::<R>()
                            .await
                            .map_err(|e| ModelError::Response(format!("malformed payload: {e}")));
                    }

                    let text = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "<body unavailable>".to_string());
                    if RetryPolicy::should_retry_status(status)
                        && attempt < self.retry.max_attempts
                    {
                        let wait = self.retry.backoff(attempt);
                        warn!("provider returned {status}, retrying in {wait:?}");
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                    return Err(ModelError::Unavailable(format!(
                        "request failed ({status}): {text}"
                    )));
                }
                Err(err) => {
                    if RetryPolicy::is_retryable(&err) && attempt < self.retry.max_attempts {
                        let wait = self.retry.backoff(attempt);
                        warn!("provider request error ({err}), retrying in {wait:?}");
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                    return Err(ModelError::Unavailable(err.to_string()));
                }
            }
        }
    }
}
