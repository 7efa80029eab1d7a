//! Ollama HTTP client
//!
//! Talks to the native `/api/embeddings` and `/api/generate` endpoints and
//! implements both provider traits.

use super::retry::RetryPolicy;
use async_trait::async_trait;
use atlas_rag_kernel::config::{ModelConfig, RagConfig};
use atlas_rag_kernel::error::{RagError, RagResult, ServiceKind};
use atlas_rag_kernel::rag::{EmbeddingProvider, GenerationProvider, GenerationRequest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Ollama client configuration
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL (default: http://localhost:11435)
    pub base_url: String,
    /// Model used for generation
    pub llm_model: String,
    /// Model used for embeddings
    pub embedding_model: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::from_model_config(&ModelConfig::default())
    }
}

impl OllamaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_model_config(models: &ModelConfig) -> Self {
        Self {
            base_url: models.base_url.trim_end_matches('/').to_string(),
            llm_model: models.llm_model.clone(),
            embedding_model: models.embedding_model.clone(),
            timeout: Duration::from_secs(models.timeout_secs),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = model.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingBody<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingReply {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    response: String,
}

/// Embedding and generation client for an Ollama-compatible server.
pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
    retry: RetryPolicy,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> RagResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RagError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            retry: RetryPolicy::default(),
        })
    }

    /// Client with the endpoint, models, timeout and attempt cap of `config`.
    pub fn from_config(config: &RagConfig) -> RagResult<Self> {
        Ok(Self::new(OllamaConfig::from_model_config(&config.models))?
            .with_retry(RetryPolicy::new(config.models.max_attempts)))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn map_error(service: ServiceKind, err: reqwest::Error) -> RagError {
        if err.is_timeout() {
            RagError::transport(service, format!("request timed out: {err}"))
        } else {
            RagError::transport(service, err.to_string())
        }
    }

    /// One POST of `body` to `path`, decoding the reply as `T`.
    async fn post_json<B, T>(&self, service: ServiceKind, path: &str, body: &B) -> RagResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, path);

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Self::map_error(service, e))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Self::map_error(service, e))?;

        if !status.is_success() {
            return Err(RagError::http_status(service, status.as_u16(), text));
        }

        serde_json::from_str(&text).map_err(|e| RagError::malformed(service, e.to_string()))
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    fn model(&self) -> &str {
        &self.config.embedding_model
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        let body = EmbeddingBody {
            model: &self.config.embedding_model,
            prompt: text,
        };
        let body = &body;

        let reply: EmbeddingReply = self
            .retry
            .run("embedding", move || {
                self.post_json(ServiceKind::Embedding, "/api/embeddings", body)
            })
            .await?;

        debug!("Embedded {} chars into {} dimensions", text.len(), reply.embedding.len());
        Ok(reply.embedding)
    }
}

#[async_trait]
impl GenerationProvider for OllamaClient {
    async fn generate(&self, request: &GenerationRequest) -> RagResult<String> {
        let reply: GenerateReply = self
            .retry
            .run("generation", move || {
                self.post_json(ServiceKind::Generation, "/api/generate", request)
            })
            .await?;

        debug!("Generated {} chars with {}", reply.response.len(), request.model);
        Ok(reply.response)
    }
}
