//! Confirmation-gated maintenance of the document store
//!
//! Every destructive call takes the text the operator typed and only acts
//! when it matches; a mismatch returns [`AdminOutcome::Cancelled`] and
//! leaves the store untouched.

use atlas_rag_kernel::admin::{
    AdminOutcome, DELETE_TOKEN, DocumentStore, IndexCreation, confirm, confirm_yes,
};
use atlas_rag_kernel::error::RagResult;
use atlas_rag_kernel::rag::VectorIndexSpec;
use std::sync::Arc;
use tracing::info;

pub struct ResourceManager {
    store: Arc<dyn DocumentStore>,
}

impl ResourceManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn database_name(&self) -> &str {
        self.store.database_name()
    }

    pub fn collection_name(&self) -> &str {
        self.store.collection_name()
    }

    pub async fn document_count(&self) -> RagResult<u64> {
        self.store.count().await
    }

    pub async fn vector_indexes(&self) -> RagResult<Vec<String>> {
        self.store.list_vector_indexes().await
    }

    /// Create the collection when missing. Needs no confirmation.
    pub async fn ensure_collection(&self) -> RagResult<AdminOutcome> {
        let name = self.store.collection_name().to_string();
        if self.store.ensure_collection().await? {
            info!("Created collection '{}'", name);
            Ok(AdminOutcome::Completed(format!("Created collection '{name}'")))
        } else {
            Ok(AdminOutcome::Skipped(format!("Collection '{name}' already exists")))
        }
    }

    /// Create the vector index after a case-insensitive `yes`.
    pub async fn create_vector_index(
        &self,
        spec: &VectorIndexSpec,
        answer: &str,
    ) -> RagResult<AdminOutcome> {
        if !confirm_yes(answer) {
            return Ok(AdminOutcome::Cancelled);
        }
        match self.store.create_vector_index(spec).await? {
            IndexCreation::Created => Ok(AdminOutcome::Completed(format!(
                "Vector search index '{}' created",
                spec.name
            ))),
            IndexCreation::AlreadyExists => Ok(AdminOutcome::Skipped(format!(
                "Index '{}' already exists",
                spec.name
            ))),
        }
    }

    /// Delete every document after a case-insensitive `yes`.
    pub async fn clear_collection(&self, answer: &str) -> RagResult<AdminOutcome> {
        let count = self.store.count().await?;
        if count == 0 {
            return Ok(AdminOutcome::Skipped(format!(
                "Collection '{}' is already empty",
                self.store.collection_name()
            )));
        }
        if !confirm_yes(answer) {
            return Ok(AdminOutcome::Cancelled);
        }

        let deleted = self.store.clear_collection().await?;
        let remaining = self.store.count().await?;
        info!("Deleted {} documents, {} remaining", deleted, remaining);
        Ok(AdminOutcome::Completed(format!(
            "Deleted {deleted} documents. Remaining documents: {remaining}"
        )))
    }

    pub async fn drop_database(&self, token: &str) -> RagResult<AdminOutcome> {
        if !confirm(DELETE_TOKEN, token) {
            return Ok(AdminOutcome::Cancelled);
        }
        self.store.drop_database().await?;
        Ok(AdminOutcome::Completed(format!(
            "Database '{}' dropped",
            self.store.database_name()
        )))
    }

    pub async fn drop_collection(&self, token: &str) -> RagResult<AdminOutcome> {
        if !confirm(DELETE_TOKEN, token) {
            return Ok(AdminOutcome::Cancelled);
        }
        let name = self.store.collection_name();
        if self.store.drop_collection().await? {
            Ok(AdminOutcome::Completed(format!("Collection '{name}' dropped")))
        } else {
            Ok(AdminOutcome::NotFound(format!("Collection '{name}' not found")))
        }
    }

    pub async fn drop_vector_index(&self, name: &str, token: &str) -> RagResult<AdminOutcome> {
        if !confirm(DELETE_TOKEN, token) {
            return Ok(AdminOutcome::Cancelled);
        }
        if self.store.drop_vector_index(name).await? {
            Ok(AdminOutcome::Completed(format!(
                "Index '{name}' drop requested"
            )))
        } else {
            Ok(AdminOutcome::NotFound(format!("Index '{name}' not found")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::InMemoryVectorStore;
    use atlas_rag_kernel::admin::StoreAdmin;
    use atlas_rag_kernel::rag::{KnowledgeRecord, SimilarityMetric, VectorStore};

    fn spec() -> VectorIndexSpec {
        VectorIndexSpec::new("vector_index", "embedding", 2, SimilarityMetric::Cosine)
    }

    async fn populated() -> (Arc<InMemoryVectorStore>, ResourceManager) {
        let store = Arc::new(InMemoryVectorStore::new(spec()));
        store
            .insert_many(vec![
                KnowledgeRecord::new("a", vec![1.0, 0.0]),
                KnowledgeRecord::new("b", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();
        let manager = ResourceManager::new(store.clone());
        (store, manager)
    }

    #[tokio::test]
    async fn wrong_token_changes_nothing() {
        let (store, manager) = populated().await;

        for token in ["delete", "DELETE ", "yes", ""] {
            assert!(manager.drop_database(token).await.unwrap().is_cancelled());
            assert!(manager.drop_collection(token).await.unwrap().is_cancelled());
            assert!(
                manager
                    .drop_vector_index("vector_index", token)
                    .await
                    .unwrap()
                    .is_cancelled()
            );
        }

        assert!(store.collection_exists());
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.list_vector_indexes().await.unwrap(), vec!["vector_index"]);
    }

    #[tokio::test]
    async fn clear_requires_yes() {
        let (store, manager) = populated().await;

        assert!(manager.clear_collection("no").await.unwrap().is_cancelled());
        assert_eq!(store.count().await.unwrap(), 2);

        let outcome = manager.clear_collection("YES\n").await.unwrap();
        assert_eq!(
            outcome,
            AdminOutcome::Completed("Deleted 2 documents. Remaining documents: 0".to_string())
        );
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn clear_on_empty_collection_is_skipped() {
        let store = Arc::new(InMemoryVectorStore::new(spec()));
        let manager = ResourceManager::new(store);

        let outcome = manager.clear_collection("yes").await.unwrap();
        assert!(matches!(outcome, AdminOutcome::Skipped(msg) if msg.contains("already empty")));
    }

    #[tokio::test]
    async fn drop_collection_reports_not_found() {
        let (store, manager) = populated().await;

        assert!(matches!(
            manager.drop_collection("DELETE").await.unwrap(),
            AdminOutcome::Completed(_)
        ));
        assert!(!store.collection_exists());
        assert!(matches!(
            manager.drop_collection("DELETE\n").await.unwrap(),
            AdminOutcome::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn drop_vector_index_reports_not_found() {
        let (_store, manager) = populated().await;

        assert!(matches!(
            manager.drop_vector_index("other_index", "DELETE").await.unwrap(),
            AdminOutcome::NotFound(_)
        ));
        assert!(matches!(
            manager.drop_vector_index("vector_index", "DELETE").await.unwrap(),
            AdminOutcome::Completed(_)
        ));
        assert!(manager.vector_indexes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn setup_flow_is_idempotent() {
        let store = Arc::new(InMemoryVectorStore::from_config(&Default::default()));
        let manager = ResourceManager::new(store.clone());

        assert!(matches!(
            manager.ensure_collection().await.unwrap(),
            AdminOutcome::Completed(_)
        ));
        assert!(matches!(
            manager.ensure_collection().await.unwrap(),
            AdminOutcome::Skipped(_)
        ));

        assert!(
            manager
                .create_vector_index(&spec(), "n")
                .await
                .unwrap()
                .is_cancelled()
        );
        assert!(store.list_vector_indexes().await.unwrap().is_empty());

        assert!(matches!(
            manager.create_vector_index(&spec(), "yes").await.unwrap(),
            AdminOutcome::Completed(_)
        ));
        assert!(matches!(
            manager.create_vector_index(&spec(), "Yes").await.unwrap(),
            AdminOutcome::Skipped(msg) if msg.contains("already exists")
        ));
    }

    #[tokio::test]
    async fn drop_database_with_token() {
        let (store, manager) = populated().await;
        assert!(matches!(
            manager.drop_database("DELETE").await.unwrap(),
            AdminOutcome::Completed(_)
        ));
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(!store.collection_exists());
    }
}
