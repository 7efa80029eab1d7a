//! Administrative contracts: store maintenance, cluster control and the
//! confirmation checks guarding destructive operations.

use crate::error::RagResult;
use crate::rag::types::VectorIndexSpec;
use crate::rag::vector_store::VectorStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Literal that destructive resource deletions must be confirmed with.
pub const DELETE_TOKEN: &str = "DELETE";

/// Exact-match confirmation.
///
/// Trailing line terminators on `provided` are ignored so raw terminal
/// input can be passed through; everything else must match byte for byte.
pub fn confirm(expected: &str, provided: &str) -> bool {
    !expected.is_empty() && provided.trim_end_matches(['\r', '\n']) == expected
}

/// Case-insensitive `yes`.
pub fn confirm_yes(provided: &str) -> bool {
    provided
        .trim_end_matches(['\r', '\n'])
        .eq_ignore_ascii_case("yes")
}

/// Result of an administrative action that may be declined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminOutcome {
    /// The action ran
    Completed(String),
    /// The target did not exist, nothing changed
    NotFound(String),
    /// Nothing to do
    Skipped(String),
    /// Confirmation did not match, nothing changed
    Cancelled,
}

impl AdminOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCreation {
    Created,
    AlreadyExists,
}

/// Collection, index and database maintenance on the document store.
#[async_trait]
pub trait StoreAdmin: Send + Sync {
    /// Create the collection if missing. Returns true when it was created.
    async fn ensure_collection(&self) -> RagResult<bool>;

    async fn create_vector_index(&self, spec: &VectorIndexSpec) -> RagResult<IndexCreation>;

    async fn list_vector_indexes(&self) -> RagResult<Vec<String>>;

    /// Returns false when no index of that name existed.
    async fn drop_vector_index(&self, name: &str) -> RagResult<bool>;

    /// Delete every record, returning how many were removed.
    async fn clear_collection(&self) -> RagResult<u64>;

    /// Returns false when the collection did not exist.
    async fn drop_collection(&self) -> RagResult<bool>;

    async fn drop_database(&self) -> RagResult<()>;

    fn database_name(&self) -> &str;

    fn collection_name(&self) -> &str;
}

/// A vector store that can also be administered.
pub trait DocumentStore: VectorStore + StoreAdmin {}

impl<T: VectorStore + StoreAdmin + ?Sized> DocumentStore for T {}

/// Cluster state as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStatus {
    #[serde(rename = "stateName")]
    pub state_name: Option<String>,
    pub paused: Option<bool>,
}

/// Lifecycle operations on a managed cluster.
#[async_trait]
pub trait ClusterControl: Send + Sync {
    fn cluster_name(&self) -> &str;

    async fn status(&self) -> RagResult<ClusterStatus>;

    async fn set_paused(&self, paused: bool) -> RagResult<()>;

    /// Irreversible. Callers gate this behind [`confirm`] with the cluster name.
    async fn terminate(&self) -> RagResult<()>;
}

/// Terminate `control`'s cluster if `provided` repeats its name exactly.
pub async fn terminate_confirmed(
    control: &dyn ClusterControl,
    provided: &str,
) -> RagResult<AdminOutcome> {
    if !confirm(control.cluster_name(), provided) {
        return Ok(AdminOutcome::Cancelled);
    }
    control.terminate().await?;
    Ok(AdminOutcome::Completed(format!(
        "Termination request accepted for cluster '{}'",
        control.cluster_name()
    )))
}
