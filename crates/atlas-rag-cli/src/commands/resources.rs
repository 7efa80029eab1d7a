//! `atlas-rag resources` command implementation

use super::{banner, print_outcome, prompt, with_store};
use crate::error::CliResult;
use atlas_rag_foundation::ResourceManager;
use atlas_rag_kernel::RagConfig;
use atlas_rag_kernel::admin::AdminOutcome;
use colored::Colorize;
use dialoguer::Select;

const MENU: [&str; 4] = [
    "1. Delete Database (Drop everything)",
    "2. Delete Collection only",
    "3. Delete Search Index only",
    "4. Exit",
];

fn report(result: CliResult<AdminOutcome>) {
    match result {
        Ok(outcome) => print_outcome(&outcome),
        Err(e) => println!("{} {}", "✗".red(), e),
    }
}

async fn delete_database(manager: &ResourceManager) -> CliResult<AdminOutcome> {
    let token = prompt(&format!(
        "{} Drop ENTIRE database '{}'? (Type 'DELETE' to confirm)",
        "WARNING:".red().bold(),
        manager.database_name()
    ))?;
    Ok(manager.drop_database(&token).await?)
}

async fn delete_collection(manager: &ResourceManager) -> CliResult<AdminOutcome> {
    let token = prompt(&format!(
        "{} Drop collection '{}'? (Type 'DELETE' to confirm)",
        "WARNING:".red().bold(),
        manager.collection_name()
    ))?;
    Ok(manager.drop_collection(&token).await?)
}

async fn delete_search_index(manager: &ResourceManager, index: &str) -> CliResult<AdminOutcome> {
    let existing = manager.vector_indexes().await?;
    if existing.is_empty() {
        println!("No search indexes on '{}'.", manager.collection_name());
    } else {
        println!("Search indexes: {}", existing.join(", "));
    }
    println!(
        "Target Index: '{}' in collection '{}'",
        index.cyan(),
        manager.collection_name()
    );
    let token = prompt("Confirm delete index? (Type 'DELETE' to confirm)")?;
    Ok(manager.drop_vector_index(index, &token).await?)
}

pub async fn run(config: &RagConfig) -> CliResult<()> {
    with_store(config, |store| async move {
        let manager = ResourceManager::new(store);
        let index = config.store.index_name.as_str();

        loop {
            banner("MongoDB Resource Manager", 40);
            println!("Target DB: {}", config.store.database);
            println!("Target Coll: {}", config.store.collection);
            println!("Target Search Index: {}", index);
            println!("{}", "-".repeat(40));

            let choice = Select::new()
                .with_prompt("Enter choice")
                .items(&MENU)
                .default(3)
                .interact()?;

            match choice {
                0 => report(delete_database(&manager).await),
                1 => report(delete_collection(&manager).await),
                2 => report(delete_search_index(&manager, index).await),
                _ => {
                    println!("Exiting...");
                    return Ok(());
                }
            }
        }
    })
    .await
}
