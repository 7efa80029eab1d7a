// llm module - Ollama client and retry policy
pub mod llm;

// RAG module - document stores and similarity
pub mod rag;

// admin module - resource manager and Atlas control plane
pub mod admin;

// built-in knowledge base
pub mod knowledge;

pub use admin::{AtlasControlPlane, ResourceManager};
pub use knowledge::{DEFAULT_QUESTION, KNOWLEDGE_BASE};
pub use llm::{OllamaClient, OllamaConfig, RetryPolicy};
pub use rag::{AtlasDocumentStore, InMemoryVectorStore};
