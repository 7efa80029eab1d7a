//! Atlas RAG CLI - ingest, ask and administer a MongoDB Atlas RAG setup

mod cli;
mod commands;
mod error;

use atlas_rag_kernel::RagConfig;
use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Variables already in the environment win over .env
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = RagConfig::from_env()?;

    let rt = tokio::runtime::Runtime::new()?;
    if let Err(e) = rt.block_on(run_command_async(cli, config)) {
        eprintln!("{} {}", "✗".red(), e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run_command_async(cli: Cli, config: RagConfig) -> error::CliResult<()> {
    match cli.command {
        Commands::Setup => commands::setup::run(&config).await,
        Commands::Ingest => commands::ingest::run(&config).await,
        Commands::Ask { query } => commands::ask::run(&config, query.as_deref()).await,
        Commands::Clear => commands::clear::run(&config).await,
        Commands::Resources => commands::resources::run(&config).await,
        Commands::Cluster => commands::cluster::run(&config).await,
    }
}
