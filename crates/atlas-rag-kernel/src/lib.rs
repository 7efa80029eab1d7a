// error module
pub mod error;
pub use error::{RagError, RagResult, ServiceKind};

// configuration module
pub mod config;
pub use config::{ControlPlaneConfig, ModelConfig, RagConfig, StoreConfig};

// administrative contracts
pub mod admin;

// Retrieval-Augmented Generation core
pub mod rag;
