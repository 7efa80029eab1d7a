//! `atlas-rag ingest` command implementation

use super::with_store;
use crate::error::CliResult;
use atlas_rag_foundation::{KNOWLEDGE_BASE, OllamaClient};
use atlas_rag_kernel::RagConfig;
use atlas_rag_kernel::rag::{Ingestor, VectorStore};
use colored::Colorize;
use std::sync::Arc;

pub async fn run(config: &RagConfig) -> CliResult<()> {
    let embedder = Arc::new(OllamaClient::from_config(config)?);

    with_store(config, |store| async move {
        let ingestor = Ingestor::new(embedder, store.clone(), config.store.dimensions);
        let report = ingestor.ingest(&KNOWLEDGE_BASE).await?;

        for failure in &report.failures {
            println!(
                "{} Skipped doc {}: {}",
                "!".yellow(),
                failure.index + 1,
                failure.reason
            );
        }

        if report.inserted == 0 {
            println!("{} No documents were prepared for insertion.", "→".yellow());
            return Ok(());
        }

        println!(
            "{} Success! Inserted {} documents.",
            "✓".green(),
            report.inserted
        );
        let total = store.count().await?;
        println!(
            "Total documents in '{}' is now: {}",
            config.store.collection.cyan(),
            total
        );
        Ok(())
    })
    .await
}
