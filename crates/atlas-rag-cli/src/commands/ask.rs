//! `atlas-rag ask` command implementation

use super::with_store;
use crate::error::CliResult;
use atlas_rag_foundation::{DEFAULT_QUESTION, OllamaClient};
use atlas_rag_kernel::RagConfig;
use atlas_rag_kernel::rag::{RagPipeline, VectorRetriever};
use colored::Colorize;
use std::sync::Arc;

pub async fn run(config: &RagConfig, query: Option<&str>) -> CliResult<()> {
    let query = query.unwrap_or(DEFAULT_QUESTION);
    let client = Arc::new(OllamaClient::from_config(config)?);

    with_store(config, |store| async move {
        println!("{} Question: {}", "→".green(), query.cyan());

        let retriever = VectorRetriever::new(client.clone(), store)
            .with_options(config.retrieval)
            .with_dimensions(config.store.dimensions);
        let pipeline = RagPipeline::new(Arc::new(retriever), client, &config.models.llm_model);

        let answer = pipeline.run(query).await?;

        println!();
        println!("{}", "--- AI RESPONSE ---".bold());
        println!("{}", answer.answer);
        println!("{}", "-------------------".bold());
        Ok(())
    })
    .await
}
