//! `atlas-rag cluster` command implementation

use super::{banner, print_outcome, prompt};
use crate::error::CliResult;
use atlas_rag_foundation::AtlasControlPlane;
use atlas_rag_kernel::RagConfig;
use atlas_rag_kernel::admin::{AdminOutcome, ClusterControl, ClusterStatus, terminate_confirmed};
use atlas_rag_kernel::error::RagResult;
use colored::Colorize;
use dialoguer::Select;

const MENU: [&str; 5] = [
    "1. Check Status",
    "2. Pause Cluster",
    "3. Resume Cluster",
    "4. Terminate Cluster (DELETE)",
    "5. Exit",
];

fn describe(status: &ClusterStatus) -> String {
    let state = status.state_name.as_deref().unwrap_or("UNKNOWN");
    match status.paused {
        Some(paused) => format!("{state} (Paused: {paused})"),
        None => state.to_string(),
    }
}

async fn check_status(control: &AtlasControlPlane) -> RagResult<()> {
    let status = control.status().await?;
    println!("Current Status: {}", describe(&status).cyan());
    Ok(())
}

async fn set_paused(control: &AtlasControlPlane, paused: bool) -> RagResult<()> {
    let verb = if paused { "PAUSE" } else { "RESUME" };
    println!(
        "{} Attempting to {} cluster '{}'...",
        "→".green(),
        verb,
        control.cluster_name()
    );
    control.set_paused(paused).await?;
    if paused {
        println!("{} Pause request sent successfully.", "✓".green());
        println!("Cluster state is now changing. This may take a few minutes.");
    } else {
        println!("{} Resume request sent successfully.", "✓".green());
        println!("Cluster is resuming. This may take a few minutes.");
    }
    Ok(())
}

async fn terminate(control: &AtlasControlPlane) -> CliResult<()> {
    println!(
        "{} You are about to TERMINATE (DELETE) cluster '{}'.",
        "WARNING:".red().bold(),
        control.cluster_name()
    );
    println!("This action is IRREVERSIBLE. All data will be lost.");
    let typed = prompt(&format!(
        "Type '{}' to confirm termination",
        control.cluster_name()
    ))?;

    match terminate_confirmed(control, &typed).await? {
        AdminOutcome::Cancelled => {
            println!("{} Termination cancelled. Name mismatch.", "→".yellow());
        }
        outcome => {
            print_outcome(&outcome);
            println!("Cluster is being deleted.");
        }
    }
    Ok(())
}

pub async fn run(config: &RagConfig) -> CliResult<()> {
    let control = AtlasControlPlane::from_config(config)?;

    loop {
        banner(
            &format!("MongoDB Atlas Cluster Manager: {}", control.cluster_name()),
            50,
        );

        let choice = Select::new()
            .with_prompt("Enter choice")
            .items(&MENU)
            .default(0)
            .interact()?;

        let result: CliResult<()> = match choice {
            0 => check_status(&control).await.map_err(Into::into),
            1 => set_paused(&control, true).await.map_err(Into::into),
            2 => set_paused(&control, false).await.map_err(Into::into),
            3 => terminate(&control).await,
            _ => {
                println!("Exiting...");
                return Ok(());
            }
        };

        if let Err(e) = result {
            println!("{} {}", "✗".red(), e);
        }
    }
}
