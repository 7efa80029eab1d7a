//! MongoDB Atlas document store
//!
//! Records live in one collection; similarity search runs through an
//! Atlas Vector Search index with the `$vectorSearch` aggregation stage.

use async_trait::async_trait;
use atlas_rag_kernel::admin::{IndexCreation, StoreAdmin};
use atlas_rag_kernel::config::StoreConfig;
use atlas_rag_kernel::error::{RagError, RagResult, ServiceKind};
use atlas_rag_kernel::rag::{
    KnowledgeRecord, SearchResult, SimilarityMetric, VectorIndexSpec, VectorStore,
};
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

const INDEX_ALREADY_EXISTS: i32 = 68;
const NAMESPACE_NOT_FOUND: i32 = 26;

fn store_error(err: MongoError) -> RagError {
    RagError::store(err.to_string())
}

fn command_code(err: &MongoError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        _ => None,
    }
}

fn is_already_exists(err: &MongoError) -> bool {
    command_code(err) == Some(INDEX_ALREADY_EXISTS) || err.to_string().contains("already exists")
}

fn is_namespace_not_found(err: &MongoError) -> bool {
    command_code(err) == Some(NAMESPACE_NOT_FOUND)
}

/// `$vectorSearch` followed by a projection onto content and score.
pub fn search_pipeline(
    config: &StoreConfig,
    query_embedding: &[f32],
    num_candidates: usize,
    limit: usize,
) -> Vec<Document> {
    let query_vector: Vec<f64> = query_embedding.iter().map(|v| f64::from(*v)).collect();
    vec![
        doc! {
            "$vectorSearch": {
                "index": config.index_name.as_str(),
                "path": config.embedding_path.as_str(),
                "queryVector": query_vector,
                "numCandidates": num_candidates as i64,
                "limit": limit as i64,
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "content": 1,
                "score": { "$meta": "vectorSearchScore" },
            }
        },
    ]
}

/// Document layout written for `record`, with the vector stored under
/// `embedding_path`. Dotted paths become nested documents.
pub fn record_document(embedding_path: &str, record: &KnowledgeRecord) -> RagResult<Document> {
    let mut document = bson::to_document(record)
        .map_err(|e| RagError::store(format!("failed to encode record: {e}")))?;
    let Some(vector) = document.remove("embedding") else {
        return Err(RagError::store("encoded record has no embedding"));
    };

    let mut segments: Vec<&str> = embedding_path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return Err(RagError::config("EMBEDDING_PATH must not be empty"));
    };
    let mut target = &mut document;
    for segment in segments {
        if !matches!(target.get(segment), Some(Bson::Document(_))) {
            target.insert(segment, Document::new());
        }
        target = match target.get_mut(segment) {
            Some(Bson::Document(inner)) => inner,
            _ => return Err(RagError::store(format!("cannot nest vector under '{segment}'"))),
        };
    }
    target.insert(leaf, vector);
    Ok(document)
}

/// `createSearchIndexes` command for a vector index on `collection`.
pub fn create_index_command(collection: &str, spec: &VectorIndexSpec) -> Document {
    doc! {
        "createSearchIndexes": collection,
        "indexes": [
            {
                "name": spec.name.as_str(),
                "type": "vectorSearch",
                "definition": {
                    "fields": [
                        {
                            "type": "vector",
                            "path": spec.path.as_str(),
                            "numDimensions": spec.dimensions as i64,
                            "similarity": spec.metric.as_str(),
                        }
                    ]
                },
            }
        ],
    }
}

/// Document store backed by a MongoDB Atlas collection.
pub struct AtlasDocumentStore {
    client: Client,
    database: Database,
    collection: Collection<KnowledgeRecord>,
    documents: Collection<Document>,
    config: StoreConfig,
}

impl AtlasDocumentStore {
    /// Open a client for `config.uri`. Servers are contacted lazily on the
    /// first operation.
    pub async fn connect(config: &StoreConfig) -> RagResult<Self> {
        info!("Connecting to MongoDB...");
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(store_error)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &StoreConfig) -> Self {
        let database = client.database(&config.database);
        let collection = database.collection::<KnowledgeRecord>(&config.collection);
        let documents = database.collection::<Document>(&config.collection);
        Self {
            client,
            database,
            collection,
            documents,
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    async fn collection_exists(&self) -> RagResult<bool> {
        let names = self
            .database
            .list_collection_names()
            .await
            .map_err(store_error)?;
        Ok(names.iter().any(|name| name == &self.config.collection))
    }
}

#[async_trait]
impl VectorStore for AtlasDocumentStore {
    async fn insert_many(&self, records: Vec<KnowledgeRecord>) -> RagResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let documents = records
            .iter()
            .map(|record| record_document(&self.config.embedding_path, record))
            .collect::<RagResult<Vec<_>>>()?;
        let result = self
            .documents
            .insert_many(&documents)
            .await
            .map_err(store_error)?;
        Ok(result.inserted_ids.len())
    }

    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        num_candidates: usize,
        limit: usize,
    ) -> RagResult<Vec<SearchResult>> {
        let pipeline = search_pipeline(&self.config, query_embedding, num_candidates, limit);
        debug!(
            "$vectorSearch on '{}' (numCandidates={}, limit={})",
            self.config.index_name, num_candidates, limit
        );

        let mut cursor = self
            .collection
            .aggregate(pipeline)
            .await
            .map_err(store_error)?;

        let mut results = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(store_error)? {
            let result: SearchResult = bson::from_document(document)
                .map_err(|e| RagError::malformed(ServiceKind::DocumentStore, e.to_string()))?;
            results.push(result);
        }
        Ok(results)
    }

    async fn count(&self) -> RagResult<u64> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(store_error)
    }

    fn index_name(&self) -> &str {
        &self.config.index_name
    }

    fn similarity_metric(&self) -> SimilarityMetric {
        self.config.metric
    }

    async fn close(&self) -> RagResult<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}

#[async_trait]
impl StoreAdmin for AtlasDocumentStore {
    async fn ensure_collection(&self) -> RagResult<bool> {
        if self.collection_exists().await? {
            return Ok(false);
        }
        self.database
            .create_collection(&self.config.collection)
            .await
            .map_err(store_error)?;
        Ok(true)
    }

    async fn create_vector_index(&self, spec: &VectorIndexSpec) -> RagResult<IndexCreation> {
        let command = create_index_command(&self.config.collection, spec);
        match self.database.run_command(command).await {
            Ok(_) => Ok(IndexCreation::Created),
            Err(e) if is_already_exists(&e) => Ok(IndexCreation::AlreadyExists),
            Err(e) => Err(store_error(e)),
        }
    }

    async fn list_vector_indexes(&self) -> RagResult<Vec<String>> {
        let mut cursor = match self
            .collection
            .aggregate(vec![doc! { "$listSearchIndexes": {} }])
            .await
        {
            Ok(cursor) => cursor,
            Err(e) if is_namespace_not_found(&e) => return Ok(Vec::new()),
            Err(e) => return Err(store_error(e)),
        };

        let mut names = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(store_error)? {
            if let Ok(name) = document.get_str("name") {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    async fn drop_vector_index(&self, name: &str) -> RagResult<bool> {
        let existing = self.list_vector_indexes().await?;
        if !existing.iter().any(|n| n == name) {
            return Ok(false);
        }
        self.database
            .run_command(doc! {
                "dropSearchIndex": self.config.collection.as_str(),
                "name": name,
            })
            .await
            .map_err(store_error)?;
        Ok(true)
    }

    async fn clear_collection(&self) -> RagResult<u64> {
        let result = self
            .collection
            .delete_many(doc! {})
            .await
            .map_err(store_error)?;
        Ok(result.deleted_count)
    }

    async fn drop_collection(&self) -> RagResult<bool> {
        if !self.collection_exists().await? {
            return Ok(false);
        }
        self.collection.drop().await.map_err(store_error)?;
        Ok(true)
    }

    async fn drop_database(&self) -> RagResult<()> {
        self.database.drop().await.map_err(store_error)
    }

    fn database_name(&self) -> &str {
        &self.config.database
    }

    fn collection_name(&self) -> &str {
        &self.config.collection
    }
}
