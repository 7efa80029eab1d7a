//! `atlas-rag clear` command implementation

use super::{print_outcome, prompt, with_store};
use crate::error::CliResult;
use atlas_rag_foundation::ResourceManager;
use atlas_rag_kernel::RagConfig;
use atlas_rag_kernel::admin::AdminOutcome;
use colored::Colorize;

pub async fn run(config: &RagConfig) -> CliResult<()> {
    with_store(config, |store| async move {
        let manager = ResourceManager::new(store);

        let count = manager.document_count().await?;
        if count == 0 {
            print_outcome(&manager.clear_collection("").await?);
            return Ok(());
        }

        println!("Found {} documents.", count);
        let answer = prompt(&format!(
            "{} Are you sure you want to delete ALL {} documents? (yes/no)",
            "WARNING:".red().bold(),
            count
        ))?;

        match manager.clear_collection(&answer).await? {
            AdminOutcome::Cancelled => println!("{} Operation cancelled.", "→".yellow()),
            outcome => print_outcome(&outcome),
        }
        Ok(())
    })
    .await
}
