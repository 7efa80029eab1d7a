//! Subcommand implementations

pub mod ask;
pub mod clear;
pub mod cluster;
pub mod ingest;
pub mod resources;
pub mod setup;

use crate::error::CliResult;
use atlas_rag_foundation::AtlasDocumentStore;
use atlas_rag_kernel::RagConfig;
use atlas_rag_kernel::admin::AdminOutcome;
use atlas_rag_kernel::rag::VectorStore;
use colored::Colorize;
use dialoguer::Input;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// Open the document store and run `f` on it through [`closing`].
pub async fn with_store<T, F, Fut>(config: &RagConfig, f: F) -> CliResult<T>
where
    F: FnOnce(Arc<AtlasDocumentStore>) -> Fut,
    Fut: Future<Output = CliResult<T>>,
{
    let store = Arc::new(AtlasDocumentStore::connect(&config.store).await?);
    closing(store, f).await
}

/// Run `f` on `store`, then close the store whatever `f` returned.
pub async fn closing<S, T, F, Fut>(store: Arc<S>, f: F) -> CliResult<T>
where
    S: VectorStore + ?Sized,
    F: FnOnce(Arc<S>) -> Fut,
    Fut: Future<Output = CliResult<T>>,
{
    let result = f(store.clone()).await;
    if let Err(e) = store.close().await {
        warn!("Failed to close MongoDB client: {}", e);
    }
    result
}

/// Read one line from the terminal; empty input is allowed.
pub fn prompt(text: &str) -> CliResult<String> {
    let answer: String = Input::new()
        .with_prompt(text)
        .allow_empty(true)
        .interact_text()?;
    Ok(answer)
}

pub fn banner(title: &str, width: usize) {
    println!();
    println!("{}", "=".repeat(width));
    println!("{}", title.bold());
    println!("{}", "=".repeat(width));
}

pub fn print_outcome(outcome: &AdminOutcome) {
    match outcome {
        AdminOutcome::Completed(msg) => println!("{} {}", "✓".green(), msg),
        AdminOutcome::NotFound(msg) => println!("{} {}", "→".yellow(), msg),
        AdminOutcome::Skipped(msg) => println!("{} {}", "→".cyan(), msg),
        AdminOutcome::Cancelled => println!("{} Cancelled.", "→".yellow()),
    }
}
