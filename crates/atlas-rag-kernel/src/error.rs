//! RAG error types
//!
//! One taxonomy shared by every pipeline stage and every concrete client.

use std::fmt;
use thiserror::Error;

/// Result type for RAG operations
pub type RagResult<T> = Result<T, RagError>;

/// External collaborator that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Embedding,
    Generation,
    DocumentStore,
    ControlPlane,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Embedding => "embedding service",
            Self::Generation => "generation service",
            Self::DocumentStore => "document store",
            Self::ControlPlane => "control-plane API",
        };
        f.write_str(name)
    }
}

/// RAG error type
#[derive(Debug, Error)]
pub enum RagError {
    /// Network or HTTP failure talking to an external service
    #[error("Transport failure ({service}): {message}")]
    Transport {
        service: ServiceKind,
        message: String,
        status: Option<u16>,
    },

    /// The service replied, but not with what was expected
    #[error("Malformed response ({service}): {message}")]
    MalformedResponse { service: ServiceKind, message: String },

    /// Similarity search returned nothing
    #[error("No documents found! Check index '{index}' or data.")]
    EmptyRetrieval { index: String },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Document store failure
    #[error("Document store error: {0}")]
    Store(String),

    /// Non-success reply from the control-plane API
    #[error("Control-plane request failed: {status} - {body}")]
    ControlPlane { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RagError {
    /// Transport failure without an HTTP status (connect, timeout, body read)
    pub fn transport(service: ServiceKind, message: impl Into<String>) -> Self {
        Self::Transport {
            service,
            message: message.into(),
            status: None,
        }
    }

    /// Transport failure carrying the HTTP status the service answered with
    pub fn http_status(service: ServiceKind, status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            service,
            message: format!("HTTP {}: {}", status, body.into()),
            status: Some(status),
        }
    }

    pub fn malformed(service: ServiceKind, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            service,
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether repeating the same call could succeed.
    ///
    /// Only transport failures qualify, and only when the service did not
    /// answer at all, rate limited us, or failed server-side.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { status: None, .. } => true,
            Self::Transport {
                status: Some(code), ..
            } => *code == 429 || *code == 408 || (500..600).contains(code),
            _ => false,
        }
    }

    /// True for the "search came back empty" outcome.
    pub fn is_empty_retrieval(&self) -> bool {
        matches!(self, Self::EmptyRetrieval { .. })
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport_failure",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::EmptyRetrieval { .. } => "empty_retrieval",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::Store(_) => "store",
            Self::ControlPlane { .. } => "control_plane",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

impl From<serde_json::Error> for RagError {
    fn from(err: serde_json::Error) -> Self {
        RagError::InvalidInput(format!("JSON error: {err}"))
    }
}
