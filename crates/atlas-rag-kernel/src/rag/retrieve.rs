//! Retrieval pipeline: embed a query and similarity-search the store.

use crate::error::{RagError, RagResult};
use crate::rag::provider::EmbeddingProvider;
use crate::rag::vector_store::VectorStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_NUM_CANDIDATES: usize = 50;
pub const DEFAULT_LIMIT: usize = 3;

/// Candidate pool and result count for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalOptions {
    pub num_candidates: usize,
    pub limit: usize,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            num_candidates: DEFAULT_NUM_CANDIDATES,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl RetrievalOptions {
    pub fn new(num_candidates: usize, limit: usize) -> Self {
        Self {
            num_candidates,
            limit,
        }
    }

    pub fn validate(&self) -> RagResult<()> {
        if self.limit == 0 {
            return Err(RagError::InvalidInput(
                "limit must be greater than 0".to_string(),
            ));
        }
        if self.num_candidates < self.limit {
            return Err(RagError::InvalidInput(format!(
                "num_candidates ({}) must be at least limit ({})",
                self.num_candidates, self.limit
            )));
        }
        Ok(())
    }
}

/// Source of context passages for a query.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Passage contents ordered by descending similarity.
    ///
    /// An empty search is reported as [`RagError::EmptyRetrieval`], never
    /// as an empty vector.
    async fn retrieve(&self, query: &str) -> RagResult<Vec<String>>;
}

/// Retriever backed by an embedding provider and a vector store.
pub struct VectorRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    options: RetrievalOptions,
    dimensions: Option<usize>,
}

impl VectorRetriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            options: RetrievalOptions::default(),
            dimensions: None,
        }
    }

    pub fn with_options(mut self, options: RetrievalOptions) -> Self {
        self.options = options;
        self
    }

    /// Reject query embeddings whose length differs from `dimensions`.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn options(&self) -> RetrievalOptions {
        self.options
    }

    /// Retrieve with an explicit candidate pool and limit.
    pub async fn retrieve_with(
        &self,
        query: &str,
        num_candidates: usize,
        limit: usize,
    ) -> RagResult<Vec<String>> {
        let options = RetrievalOptions::new(num_candidates, limit);
        options.validate()?;

        let query_embedding = self.embedder.embed(query).await?;
        if let Some(expected) = self.dimensions {
            if query_embedding.len() != expected {
                return Err(RagError::DimensionMismatch {
                    expected,
                    actual: query_embedding.len(),
                });
            }
        }

        let results = self
            .store
            .similarity_search(&query_embedding, options.num_candidates, options.limit)
            .await?;

        if results.is_empty() {
            return Err(RagError::EmptyRetrieval {
                index: self.store.index_name().to_string(),
            });
        }

        let metric = self.store.similarity_metric();
        debug!(
            "Top {} score {:.4} over {} results",
            metric,
            results[0].score,
            results.len()
        );
        info!("Found {} relevant docs.", results.len());

        Ok(results.into_iter().map(|r| r.content).collect())
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn retrieve(&self, query: &str) -> RagResult<Vec<String>> {
        self.retrieve_with(query, self.options.num_candidates, self.options.limit)
            .await
    }
}
