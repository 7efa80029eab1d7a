use atlas_rag_kernel::error::RagError;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{}: {}", .0.kind(), .0)]
    Rag(#[from] RagError),

    #[error("Dialoguer error: {0}")]
    DialoguerError(#[from] dialoguer::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
