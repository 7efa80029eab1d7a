//! Embedding and generation service contracts.

use crate::error::RagResult;
use crate::rag::types::GenerationRequest;
use async_trait::async_trait;

/// Turns text into a fixed-length vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier of the embedding model in use
    fn model(&self) -> &str;

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>>;
}

/// Produces a completion for a prompt.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> RagResult<String>;
}
