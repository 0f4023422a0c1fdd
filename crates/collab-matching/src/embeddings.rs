//! Embedding provider seam and the TEI (Text Embeddings Inference) client.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::error::MatchingError;
use crate::retry::retry_with_backoff;

/// Anything that can turn text into a fixed-length vector.
pub trait Embedder: Send + Sync {
    /// # Errors
    ///
    /// Returns [`MatchingError`] when the provider cannot produce a vector.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, MatchingError>> + Send;
}

/// TEI HTTP client.
#[derive(Debug, Clone)]
pub struct TeiClient {
    client: reqwest::Client,
    url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
}

impl TeiClient {
    /// Create a client for the TEI server at `tei_url`.
    ///
    /// `request_timeout` bounds each individual HTTP attempt.
    ///
    /// # Errors
    ///
    /// Returns [`MatchingError::Http`] if the HTTP client cannot be built.
    pub fn new(tei_url: &str, request_timeout: Duration) -> Result<Self, MatchingError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/embed", tei_url.trim_end_matches('/')),
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Retry transient failures up to `max_retries` times.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    async fn embed_once(&self, text: &str) -> Result<Vec<f32>, MatchingError> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { inputs: text })
            .send()
            .await?
            .error_for_status()?;

        let embeddings: Vec<Vec<f32>> = response.json().await.map_err(|e| {
            MatchingError::EmbeddingUnavailable(format!("TEI response parse error: {e}"))
        })?;

        embeddings
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| MatchingError::EmbeddingUnavailable("TEI returned no embedding".into()))
    }
}

impl Embedder for TeiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MatchingError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.embed_once(text)
        })
        .await
    }
}
