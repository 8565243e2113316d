//! The generative backend capability consumed by the executor.
//!
//! The backend is handed a rendered prompt plus the descriptor of the shape
//! it should produce, and returns a best-effort untyped reply or fails. It
//! offers no conformance guarantee; the executor validates every reply.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{info, instrument, warn};

use bloom_types::{GenerationReply, GenerationRequest};

/// A generative capability: rendered prompt in, untyped reply out.
///
/// Implementations are treated as unbounded, stateless, externally
/// rate-limited services. Any deadline is the implementation's business; the
/// executor makes exactly one attempt per flow invocation and never retries.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Submit a prompt and the expected output shape, returning the raw
    /// reply. The reply is untyped and must still be validated by the caller.
    async fn generate(&self, prompt: &str, output_shape: &Value) -> Result<Value>;
}

/// HTTP binding to a generation service.
pub struct HttpBackend {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpBackend {
    /// Create a backend for an explicit endpoint.
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            api_key,
        }
    }

    /// Create a backend configured from the environment.
    ///
    /// Reads `BLOOM_API_URL` (defaulting to the local dev server) and
    /// `BLOOM_API_KEY` (optional).
    pub fn from_env() -> Self {
        let api_url = match std::env::var("BLOOM_API_URL") {
            Ok(url) => {
                info!("using BLOOM_API_URL from environment");
                url
            }
            Err(_) => {
                let default_url = "http://localhost:9090/gen/bloom".to_string();
                info!("BLOOM_API_URL not set, using default: {default_url}");
                default_url
            }
        };

        let api_key = match std::env::var("BLOOM_API_KEY") {
            Ok(key) if !key.is_empty() => {
                info!("using BLOOM_API_KEY from environment");
                Some(key)
            }
            _ => {
                warn!("BLOOM_API_KEY not set or empty; sending unauthenticated requests");
                None
            }
        };

        Self::new(api_url, api_key)
    }
}

#[async_trait]
impl GenerativeBackend for HttpBackend {
    #[instrument(skip(self, prompt, output_shape), name = "backend.generate")]
    async fn generate(&self, prompt: &str, output_shape: &Value) -> Result<Value> {
        let request = GenerationRequest {
            prompt: prompt.to_string(),
            output_shape: output_shape.clone(),
        };

        let mut request_builder = self.client.post(&self.api_url);
        if let Some(api_key) = &self.api_key {
            request_builder = request_builder.header("X-API-Key", api_key);
        }
        let response = request_builder
            .json(&request)
            .send()
            .await
            .context("failed to send request to the generation service")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("generation request failed with status {status}: {error_body}");
        }

        let reply: GenerationReply = response
            .json()
            .await
            .context("failed to deserialize the generation service response")?;

        info!("received reply from generation service");
        Ok(reply.result)
    }
}
