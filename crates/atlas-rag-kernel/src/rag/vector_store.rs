//! VectorStore trait definition
//!
//! Defines the abstract interface for the document store and its
//! similarity search. Concrete implementations (InMemoryVectorStore,
//! AtlasDocumentStore) live in atlas-rag-foundation.

use crate::error::RagResult;
use crate::rag::types::{KnowledgeRecord, SearchResult, SimilarityMetric};
use async_trait::async_trait;

/// Append-only writer plus similarity reader over [`KnowledgeRecord`]s.
///
/// # Example
///
/// ```rust,ignore
/// use atlas_rag_kernel::rag::{KnowledgeRecord, VectorStore};
///
/// store.insert_many(vec![KnowledgeRecord::new("Rust is fast", embedding)]).await?;
///
/// let results = store.similarity_search(&query_embedding, 50, 3).await?;
/// for result in results {
///     println!("{}: {}", result.score, result.content);
/// }
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Write all records in one batch and return how many were inserted.
    ///
    /// No deduplication and no schema validation happen here.
    async fn insert_many(&self, records: Vec<KnowledgeRecord>) -> RagResult<usize>;

    /// Return up to `limit` records most similar to `query_embedding`,
    /// highest score first.
    ///
    /// `num_candidates` bounds the candidate pool considered before
    /// ranking. Order among equal scores is implementation-defined.
    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        num_candidates: usize,
        limit: usize,
    ) -> RagResult<Vec<SearchResult>>;

    /// Number of records currently stored.
    async fn count(&self) -> RagResult<u64>;

    /// Name of the vector index searches go through.
    fn index_name(&self) -> &str;

    /// Similarity metric the index ranks with.
    fn similarity_metric(&self) -> SimilarityMetric;

    /// Release the underlying connection. Stores without one do nothing.
    async fn close(&self) -> RagResult<()> {
        Ok(())
    }
}
