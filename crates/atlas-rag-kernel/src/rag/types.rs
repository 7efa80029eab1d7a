//! RAG core data types
//!
//! Types shared by the store, provider and pipeline interfaces.

use crate::error::{RagError, RagResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provenance label attached to records written by the ingestion pipeline.
pub const DEFAULT_SOURCE: &str = "knowledge_base_script";

/// A stored unit of retrievable knowledge.
///
/// Created once per knowledge-base entry during ingestion and never
/// mutated afterwards. The field names are the document layout written to
/// the store, so `embedding` is also the default vector path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    /// The literal passage
    pub content: String,
    /// Embedding vector of `content`
    pub embedding: Vec<f32>,
    /// Optional provenance label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl KnowledgeRecord {
    pub fn new(content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            content: content.into(),
            embedding,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}

/// One ranked match returned from a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched passage
    pub content: String,
    /// Similarity score, higher is more similar
    pub score: f32,
}

impl SearchResult {
    pub fn new(content: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            score,
        }
    }

    pub fn from_record(record: &KnowledgeRecord, score: f32) -> Self {
        Self {
            content: record.content.clone(),
            score,
        }
    }
}

/// Similarity metric used for comparing embedding vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SimilarityMetric {
    /// Cosine similarity (angle between vectors)
    #[default]
    Cosine,
    /// Euclidean distance, mapped so that higher is more similar
    Euclidean,
    /// Dot product (higher is more similar)
    DotProduct,
}

impl SimilarityMetric {
    /// Name used in vector index definitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
            Self::DotProduct => "dotProduct",
        }
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityMetric {
    type Err = RagError;

    fn from_str(s: &str) -> RagResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclidean" => Ok(Self::Euclidean),
            "dotproduct" | "dot_product" | "dot" => Ok(Self::DotProduct),
            other => Err(RagError::config(format!(
                "unknown similarity metric '{other}' (expected cosine, euclidean or dotProduct)"
            ))),
        }
    }
}

/// Definition of a vector search index over one field of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorIndexSpec {
    pub name: String,
    /// Document field holding the vector
    pub path: String,
    pub dimensions: usize,
    pub metric: SimilarityMetric,
}

impl VectorIndexSpec {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        dimensions: usize,
        metric: SimilarityMetric,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            dimensions,
            metric,
        }
    }

    /// The `fields` definition understood by Atlas Vector Search.
    pub fn definition(&self) -> serde_json::Value {
        serde_json::json!({
            "fields": [
                {
                    "type": "vector",
                    "path": self.path,
                    "numDimensions": self.dimensions,
                    "similarity": self.metric.as_str(),
                }
            ]
        })
    }
}

/// Request sent to a text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

impl GenerationRequest {
    /// Single non-streaming completion request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
        }
    }
}
