//! CLI command definitions using clap

use clap::{Parser, Subcommand};

/// Atlas RAG - retrieval-augmented generation over MongoDB Atlas and Ollama
#[derive(Parser)]
#[command(name = "atlas-rag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create the collection and the vector search index
    Setup,

    /// Embed the built-in knowledge base and store it
    Ingest,

    /// Answer a question from the stored knowledge
    Ask {
        /// Question to answer
        query: Option<String>,
    },

    /// Delete every document in the collection
    Clear,

    /// Drop the database, the collection or the vector index
    Resources,

    /// Check, pause, resume or terminate the Atlas cluster
    Cluster,
}
