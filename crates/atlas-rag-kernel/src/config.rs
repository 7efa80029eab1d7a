//! Runtime configuration
//!
//! Built once at process start and handed to every constructor. Values
//! come from environment variables with the defaults below; the binary
//! loads `.env` before calling [`RagConfig::from_env`].

use crate::error::{RagError, RagResult};
use crate::rag::retrieve::RetrievalOptions;
use crate::rag::types::{SimilarityMetric, VectorIndexSpec};
use std::str::FromStr;

pub const DEFAULT_MONGO_URI: &str =
    "mongodb+srv://<username>:<password>@cluster.example.mongodb.net/?appName=MongoDB";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11435";
pub const DEFAULT_ATLAS_API_BASE_URL: &str = "https://cloud.mongodb.com/api/atlas/v1.0";

/// Document store settings
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub index_name: String,
    /// Field holding the embedding vector
    pub embedding_path: String,
    pub dimensions: usize,
    pub metric: SimilarityMetric,
}

impl StoreConfig {
    pub fn index_spec(&self) -> VectorIndexSpec {
        VectorIndexSpec::new(
            &self.index_name,
            &self.embedding_path,
            self.dimensions,
            self.metric,
        )
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGO_URI.to_string(),
            database: "mydb".to_string(),
            collection: "mycollection".to_string(),
            index_name: "vector_index".to_string(),
            embedding_path: "embedding".to_string(),
            dimensions: 768,
            metric: SimilarityMetric::Cosine,
        }
    }
}

/// Embedding and generation service settings
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub base_url: String,
    pub llm_model: String,
    pub embedding_model: String,
    pub timeout_secs: u64,
    /// Attempts per call, including the first
    pub max_attempts: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            llm_model: "llama3".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            timeout_secs: 120,
            max_attempts: 3,
        }
    }
}

/// Atlas Admin API credentials and target
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPlaneConfig {
    pub base_url: String,
    pub public_key: Option<String>,
    pub private_key: Option<String>,
    pub project_id: Option<String>,
    pub cluster_name: Option<String>,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ATLAS_API_BASE_URL.to_string(),
            public_key: None,
            private_key: None,
            project_id: None,
            cluster_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RagConfig {
    pub store: StoreConfig,
    pub models: ModelConfig,
    pub retrieval: RetrievalOptions,
    pub control_plane: ControlPlaneConfig,
}

impl RagConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> RagResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset keys.
    pub fn from_lookup<F>(lookup: F) -> RagResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let optional = |key: &str| -> Option<String> {
            lookup(key).filter(|v| !v.trim().is_empty())
        };

        let store = StoreConfig {
            uri: text("MONGO_URI", &defaults.store.uri),
            database: text("MONGO_DATABASE", &defaults.store.database),
            collection: text("MONGO_COLLECTION", &defaults.store.collection),
            index_name: text("VECTOR_INDEX_NAME", &defaults.store.index_name),
            embedding_path: text("EMBEDDING_PATH", &defaults.store.embedding_path),
            dimensions: parsed(&lookup, "EMBEDDING_DIMENSIONS", defaults.store.dimensions)?,
            metric: parsed(&lookup, "SIMILARITY_METRIC", defaults.store.metric)?,
        };

        let models = ModelConfig {
            base_url: text("OLLAMA_URL", &defaults.models.base_url),
            llm_model: text("LLM_MODEL", &defaults.models.llm_model),
            embedding_model: text("EMBEDDING_MODEL", &defaults.models.embedding_model),
            timeout_secs: parsed(&lookup, "HTTP_TIMEOUT_SECS", defaults.models.timeout_secs)?,
            max_attempts: parsed(&lookup, "RAG_MAX_ATTEMPTS", defaults.models.max_attempts)?,
        };

        let retrieval = RetrievalOptions::new(
            parsed(&lookup, "RAG_NUM_CANDIDATES", defaults.retrieval.num_candidates)?,
            parsed(&lookup, "RAG_LIMIT", defaults.retrieval.limit)?,
        );

        let control_plane = ControlPlaneConfig {
            base_url: text("ATLAS_API_BASE_URL", &defaults.control_plane.base_url),
            public_key: optional("ATLAS_PUBLIC_KEY"),
            private_key: optional("ATLAS_PRIVATE_KEY"),
            project_id: optional("ATLAS_PROJECT_ID"),
            cluster_name: optional("ATLAS_CLUSTER_NAME"),
        };

        let config = Self {
            store,
            models,
            retrieval,
            control_plane,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RagResult<()> {
        if self.store.dimensions == 0 {
            return Err(RagError::config("EMBEDDING_DIMENSIONS must be greater than 0"));
        }
        if self.models.timeout_secs == 0 {
            return Err(RagError::config("HTTP_TIMEOUT_SECS must be greater than 0"));
        }
        if self.models.max_attempts == 0 {
            return Err(RagError::config("RAG_MAX_ATTEMPTS must be at least 1"));
        }
        self.retrieval
            .validate()
            .map_err(|e| RagError::config(e.to_string()))
    }
}

fn parsed<T, F>(lookup: &F, key: &str, default: T) -> RagResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| RagError::config(format!("invalid value for {key} ('{raw}'): {e}"))),
        None => Ok(default),
    }
}
