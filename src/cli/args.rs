//! Command line argument parsing for the Kanto CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kanto - embedding-based similarity search over a Pokémon catalog
#[derive(Parser, Debug, Clone)]
#[command(name = "kanto")]
#[command(about = "Browse a Pokémon catalog and find visually similar entries")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct KantoArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Path to the catalog CSV file
    #[arg(long = "data", value_name = "CSV_FILE", default_value = "pokemon_data.csv")]
    pub data_path: PathBuf,

    /// Path to the embedding source JSON file
    #[arg(
        long = "embeddings",
        value_name = "JSON_FILE",
        default_value = "static/pokemon_embeddings.json"
    )]
    pub embeddings_path: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl KantoArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search the catalog by name, form or type
    Search(SearchArgs),

    /// Find the Pokémon most visually similar to a catalog entry
    Similar(SimilarArgs),

    /// Show catalog and embedding statistics
    Stats(StatsArgs),
}

/// Arguments for searching the catalog
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Search query (case-insensitive substring)
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of matches to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for similarity lookup
#[derive(Parser, Debug, Clone)]
pub struct SimilarArgs {
    /// 1-based catalog ID of the query Pokémon
    #[arg(value_name = "ID")]
    pub id: u32,

    /// Number of similar entries to return
    #[arg(short = 'k', long = "top-k", default_value = "6")]
    pub top_k: usize,

    /// Seconds to wait for the embedding load before giving up
    #[arg(long, default_value = "10")]
    pub timeout: u64,
}

/// Arguments for showing statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Also audit embedding norms
    #[arg(long)]
    pub check_norms: bool,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
