//! Model service clients
//!
//! [`OllamaClient`] implements both the embedding and the generation
//! provider, wrapped in a capped [`RetryPolicy`].

pub mod ollama;
pub mod retry;

pub use ollama::{OllamaClient, OllamaConfig};
pub use retry::{BackoffStrategy, RetryPolicy};
