//! In-memory document store
//!
//! Brute-force store mirroring the observable behaviour of an Atlas
//! collection with a vector search index. Used for tests and local runs.

use crate::rag::similarity::compute_similarity;
use async_trait::async_trait;
use atlas_rag_kernel::admin::{IndexCreation, StoreAdmin};
use atlas_rag_kernel::config::StoreConfig;
use atlas_rag_kernel::error::{RagError, RagResult};
use atlas_rag_kernel::rag::{
    KnowledgeRecord, SearchResult, SimilarityMetric, VectorIndexSpec, VectorStore,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default)]
struct State {
    collection_exists: bool,
    records: Vec<KnowledgeRecord>,
    indexes: BTreeMap<String, VectorIndexSpec>,
}

/// In-memory vector store using exact similarity search.
///
/// Searches go through the named vector index: while that index does not
/// exist every search returns nothing, and records whose embedding length
/// differs from the index dimensions are not searchable. Equal scores keep
/// insertion order.
///
/// # Example
///
/// ```rust,ignore
/// use atlas_rag_foundation::rag::InMemoryVectorStore;
/// use atlas_rag_kernel::rag::{KnowledgeRecord, SimilarityMetric, VectorIndexSpec, VectorStore};
///
/// let store = InMemoryVectorStore::new(VectorIndexSpec::new(
///     "vector_index", "embedding", 3, SimilarityMetric::Cosine,
/// ));
/// store.insert_many(vec![KnowledgeRecord::new("Hello world", vec![0.1, 0.2, 0.3])]).await?;
///
/// let results = store.similarity_search(&[0.1, 0.2, 0.3], 50, 3).await?;
/// ```
pub struct InMemoryVectorStore {
    database: String,
    collection: String,
    index_name: String,
    metric: SimilarityMetric,
    state: RwLock<State>,
}

impl InMemoryVectorStore {
    /// A store whose collection and vector index already exist.
    pub fn new(spec: VectorIndexSpec) -> Self {
        let store = Self {
            database: "memory".to_string(),
            collection: "records".to_string(),
            index_name: spec.name.clone(),
            metric: spec.metric,
            state: RwLock::new(State::default()),
        };
        {
            let mut state = store.state.write();
            state.collection_exists = true;
            state.indexes.insert(spec.name.clone(), spec);
        }
        store
    }

    /// An empty store named after `config`, with neither collection nor
    /// index created yet.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            database: config.database.clone(),
            collection: config.collection.clone(),
            index_name: config.index_name.clone(),
            metric: config.metric,
            state: RwLock::new(State::default()),
        }
    }

    pub fn collection_exists(&self) -> bool {
        self.state.read().collection_exists
    }

    /// Snapshot of the stored records in insertion order.
    pub fn records(&self) -> Vec<KnowledgeRecord> {
        self.state.read().records.clone()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert_many(&self, records: Vec<KnowledgeRecord>) -> RagResult<usize> {
        let inserted = records.len();
        let mut state = self.state.write();
        state.collection_exists = true;
        state.records.extend(records);
        Ok(inserted)
    }

    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        num_candidates: usize,
        limit: usize,
    ) -> RagResult<Vec<SearchResult>> {
        let state = self.state.read();
        let Some(index) = state.indexes.get(&self.index_name) else {
            debug!("Vector index '{}' does not exist", self.index_name);
            return Ok(Vec::new());
        };

        if query_embedding.len() != index.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: index.dimensions,
                actual: query_embedding.len(),
            });
        }

        let mut scored: Vec<SearchResult> = state
            .records
            .iter()
            .filter(|record| record.dimensions() == index.dimensions)
            .map(|record| {
                let score = compute_similarity(&record.embedding, query_embedding, index.metric);
                SearchResult::from_record(record, score)
            })
            .collect();

        // exact scan, num_candidates only has to cover limit
        debug!(
            "Scored {} records (num_candidates={}, limit={})",
            scored.len(),
            num_candidates,
            limit
        );

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);

        Ok(scored)
    }

    async fn count(&self) -> RagResult<u64> {
        Ok(self.state.read().records.len() as u64)
    }

    fn index_name(&self) -> &str {
        &self.index_name
    }

    fn similarity_metric(&self) -> SimilarityMetric {
        self.metric
    }
}

#[async_trait]
impl StoreAdmin for InMemoryVectorStore {
    async fn ensure_collection(&self) -> RagResult<bool> {
        let mut state = self.state.write();
        let created = !state.collection_exists;
        state.collection_exists = true;
        Ok(created)
    }

    async fn create_vector_index(&self, spec: &VectorIndexSpec) -> RagResult<IndexCreation> {
        let mut state = self.state.write();
        if !state.collection_exists {
            return Err(RagError::store(format!(
                "Collection '{}' does not exist",
                self.collection
            )));
        }
        if state.indexes.contains_key(&spec.name) {
            return Ok(IndexCreation::AlreadyExists);
        }
        state.indexes.insert(spec.name.clone(), spec.clone());
        Ok(IndexCreation::Created)
    }

    async fn list_vector_indexes(&self) -> RagResult<Vec<String>> {
        Ok(self.state.read().indexes.keys().cloned().collect())
    }

    async fn drop_vector_index(&self, name: &str) -> RagResult<bool> {
        Ok(self.state.write().indexes.remove(name).is_some())
    }

    async fn clear_collection(&self) -> RagResult<u64> {
        let mut state = self.state.write();
        let deleted = state.records.len() as u64;
        state.records.clear();
        Ok(deleted)
    }

    async fn drop_collection(&self) -> RagResult<bool> {
        let mut state = self.state.write();
        if !state.collection_exists {
            return Ok(false);
        }
        *state = State::default();
        Ok(true)
    }

    async fn drop_database(&self) -> RagResult<()> {
        *self.state.write() = State::default();
        Ok(())
    }

    fn database_name(&self) -> &str {
        &self.database
    }

    fn collection_name(&self) -> &str {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dimensions: usize, metric: SimilarityMetric) -> InMemoryVectorStore {
        InMemoryVectorStore::new(VectorIndexSpec::new(
            "vector_index",
            "embedding",
            dimensions,
            metric,
        ))
    }

    fn record(text: &str, embedding: Vec<f32>) -> KnowledgeRecord {
        KnowledgeRecord::new(text, embedding)
    }

    #[tokio::test]
    async fn test_insert_and_count() {
        let store = store(2, SimilarityMetric::Cosine);
        assert_eq!(store.count().await.unwrap(), 0);

        let inserted = store
            .insert_many(vec![record("a", vec![1.0, 0.0]), record("b", vec![0.0, 1.0])])
            .await
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_does_not_deduplicate() {
        let store = store(2, SimilarityMetric::Cosine);
        store.insert_many(vec![record("a", vec![1.0, 0.0])]).await.unwrap();
        store.insert_many(vec![record("a", vec![1.0, 0.0])]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_search_returns_most_similar() {
        let store = store(3, SimilarityMetric::Cosine);
        store
            .insert_many(vec![
                record("rust lang", vec![1.0, 0.0, 0.0]),
                record("python lang", vec![0.0, 1.0, 0.0]),
                record("mostly rust", vec![0.9, 0.1, 0.0]),
            ])
            .await
            .unwrap();

        let results = store
            .similarity_search(&[1.0, 0.0, 0.0], 50, 2)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "rust lang");
        assert_eq!(results[1].content, "mostly rust");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_equal_scores_keep_insertion_order() {
        let store = store(2, SimilarityMetric::Cosine);
        store
            .insert_many(vec![
                record("first", vec![1.0, 1.0]),
                record("second", vec![1.0, 1.0]),
                record("third", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0, 1.0], 50, 3).await.unwrap();
        let contents: Vec<_> = results.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_missing_index_returns_nothing() {
        let store = InMemoryVectorStore::from_config(&StoreConfig {
            dimensions: 2,
            ..StoreConfig::default()
        });
        store.insert_many(vec![record("a", vec![1.0, 0.0])]).await.unwrap();

        let results = store.similarity_search(&[1.0, 0.0], 50, 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_query_dimension_must_match_index() {
        let store = store(3, SimilarityMetric::Cosine);
        let err = store.similarity_search(&[1.0, 0.0], 50, 3).await.unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_records_of_other_dimensions_are_not_searchable() {
        let store = store(2, SimilarityMetric::Cosine);
        store
            .insert_many(vec![record("fits", vec![1.0, 0.0]), record("too long", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0, 0.0], 50, 3).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "fits");
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_euclidean_metric() {
        let store = store(2, SimilarityMetric::Euclidean);
        store
            .insert_many(vec![record("far", vec![10.0, 10.0]), record("near", vec![1.0, 0.0])])
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0, 0.0], 50, 2).await.unwrap();
        assert_eq!(results[0].content, "near");
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_dot_product_metric() {
        let store = store(2, SimilarityMetric::DotProduct);
        store
            .insert_many(vec![
                record("small projection", vec![0.1, 0.1]),
                record("big projection", vec![2.0, 3.0]),
            ])
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0, 1.0], 50, 2).await.unwrap();
        assert_eq!(results[0].content, "big projection");
    }

    #[tokio::test]
    async fn test_admin_lifecycle() {
        let spec = VectorIndexSpec::new("vector_index", "embedding", 2, SimilarityMetric::Cosine);
        let store = InMemoryVectorStore::from_config(&StoreConfig::default());

        assert!(!store.collection_exists());
        assert!(store.create_vector_index(&spec).await.is_err());

        assert!(store.ensure_collection().await.unwrap());
        assert!(!store.ensure_collection().await.unwrap());

        assert_eq!(
            store.create_vector_index(&spec).await.unwrap(),
            IndexCreation::Created
        );
        assert_eq!(
            store.create_vector_index(&spec).await.unwrap(),
            IndexCreation::AlreadyExists
        );
        assert_eq!(store.list_vector_indexes().await.unwrap(), vec!["vector_index"]);

        store.insert_many(vec![record("a", vec![1.0, 0.0])]).await.unwrap();
        assert_eq!(store.clear_collection().await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 0);

        assert!(store.drop_vector_index("vector_index").await.unwrap());
        assert!(!store.drop_vector_index("vector_index").await.unwrap());

        assert!(store.drop_collection().await.unwrap());
        assert!(!store.drop_collection().await.unwrap());
        assert_eq!(store.database_name(), "mydb");
        assert_eq!(store.collection_name(), "mycollection");
    }
}
