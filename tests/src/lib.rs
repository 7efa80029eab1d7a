//! Atlas RAG Testing Framework
//!
//! Deterministic embedding and generation doubles for exercising the
//! ingestion, retrieval and answer pipelines without a model server.

pub mod embedders;
pub mod generator;

pub use embedders::{FailingEmbedder, FixedEmbedder, HashingEmbedder};
pub use generator::RecordingGenerator;
