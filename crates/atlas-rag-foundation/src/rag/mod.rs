//! RAG (Retrieval-Augmented Generation) implementations
//!
//! Concrete document stores for the traits defined in atlas-rag-kernel.

pub mod atlas_store;
pub mod similarity;
pub mod vector_store;

pub use atlas_store::AtlasDocumentStore;
pub use similarity::compute_similarity;
pub use vector_store::InMemoryVectorStore;

// Re-export kernel types for convenience
pub use atlas_rag_kernel::rag::{KnowledgeRecord, SearchResult, SimilarityMetric, VectorStore};
