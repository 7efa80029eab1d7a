//! RAG (Retrieval-Augmented Generation) traits, types and pipelines
//!
//! Defines the store and provider abstractions plus the ingestion,
//! retrieval and orchestration flows built on them. Concrete clients live
//! in atlas-rag-foundation.

pub mod ingest;
pub mod pipeline;
pub mod provider;
pub mod retrieve;
pub mod types;
pub mod vector_store;

pub use ingest::{IngestFailure, IngestReport, Ingestor};
pub use pipeline::{PromptTemplate, RagAnswer, RagPipeline, build_context};
pub use provider::{EmbeddingProvider, GenerationProvider};
pub use retrieve::{RetrievalOptions, Retriever, VectorRetriever};
pub use types::{
    DEFAULT_SOURCE, GenerationRequest, KnowledgeRecord, SearchResult, SimilarityMetric,
    VectorIndexSpec,
};
pub use vector_store::VectorStore;
