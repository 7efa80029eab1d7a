//! Built-in knowledge base ingested by `atlas-rag ingest`

pub const KNOWLEDGE_BASE: [&str; 4] = [
    "Retrieval-Augmented Generation (RAG) is a method that retrieves data from an external database to ground LLM responses in reality.",
    "RAG prevents LLM hallucinations by forcing the model to use retrieved facts instead of training memory.",
    "MongoDB Atlas Vector Search stores high-dimensional embeddings (vectors) to enable fast semantic retrieval for RAG.",
    "In a RAG pipeline, the system first searches for relevant documents, then sends them as context to the LLM.",
];

/// Question asked by `atlas-rag ask` when none is given.
pub const DEFAULT_QUESTION: &str = "What is RAG and why is it useful?";
