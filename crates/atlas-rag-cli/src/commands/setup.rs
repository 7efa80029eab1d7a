//! `atlas-rag setup` command implementation

use super::{banner, print_outcome, prompt, with_store};
use crate::error::CliResult;
use atlas_rag_foundation::ResourceManager;
use atlas_rag_kernel::RagConfig;
use atlas_rag_kernel::admin::AdminOutcome;
use atlas_rag_kernel::rag::VectorIndexSpec;
use colored::Colorize;

/// Index definition as pasted into the Atlas UI JSON editor.
fn manual_definition(spec: &VectorIndexSpec) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(&spec.definition())?)
}

pub async fn run(config: &RagConfig) -> CliResult<()> {
    banner("MongoDB Atlas Setup", 60);

    with_store(config, |store| async move {
        let manager = ResourceManager::new(store);
        print_outcome(&manager.ensure_collection().await?);

        let spec = config.store.index_spec();
        println!();
        println!(
            "Proceed to create Vector Search Index '{}' ({} dimensions, {})?",
            spec.name.cyan(),
            spec.dimensions,
            spec.metric
        );
        let answer = prompt("Enter 'yes' to continue")?;

        match manager.create_vector_index(&spec, &answer).await {
            Ok(AdminOutcome::Cancelled) => {
                println!("{} Skipped index creation.", "→".yellow());
            }
            Ok(outcome @ AdminOutcome::Completed(_)) => {
                print_outcome(&outcome);
                println!();
                println!("{}", "IMPORTANT: Index building happens in the background.".bold());
                println!("Please wait 1-2 minutes before running search queries.");
            }
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => {
                println!("{} Error creating index: {}", "✗".red(), e);
                println!();
                println!("If this fails, please use Atlas UI:");
                println!("1. Go to Database > Search Indexes");
                println!("2. Create Search Index > JSON Editor");
                println!("3. Index Name: {}", spec.name);
                println!("4. Paste this JSON:");
                println!("{}", manual_definition(&spec)?);
            }
        }
        Ok(())
    })
    .await
}
