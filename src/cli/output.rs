//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{KantoArgs, OutputFormat};
use crate::error::Result;

/// A catalog entry as presented by the CLI.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u32,
    pub name: String,
    pub types: String,
}

/// Result structure for catalog search.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchMatches {
    pub query: String,
    pub matches: Vec<CatalogEntry>,
    pub total_matches: usize,
}

/// One similar-entry row: the neighbor plus its similarity score.
#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarEntry {
    pub id: u32,
    pub name: String,
    pub score: f32,
}

/// Result structure for similarity lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarMatches {
    pub query: CatalogEntry,
    pub neighbors: Vec<SimilarEntry>,
}

/// Catalog and embedding statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogStats {
    pub catalog_records: usize,
    pub embeddings: usize,
    pub dimension: usize,
    pub non_unit_norms: Option<usize>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &KantoArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &KantoArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &KantoArgs) -> Result<()> {
    if args.verbosity() > 0 && !message.is_empty() {
        println!("{message}");
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;

    match result {
        _ if std::any::type_name::<T>().contains("SearchMatches") => {
            output_search_matches_human(&value)
        }
        _ if std::any::type_name::<T>().contains("SimilarMatches") => {
            output_similar_matches_human(&value)
        }
        _ if std::any::type_name::<T>().contains("CatalogStats") => {
            output_catalog_stats_human(&value)
        }
        _ => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
    }
}

fn output_search_matches_human(value: &serde_json::Value) -> Result<()> {
    let total = value["total_matches"].as_u64().unwrap_or(0);
    println!("{total} match(es)");
    if let Some(matches) = value["matches"].as_array() {
        for entry in matches {
            println!(
                "  #{:04}  {:<30} {}",
                entry["id"].as_u64().unwrap_or(0),
                entry["name"].as_str().unwrap_or(""),
                entry["types"].as_str().unwrap_or(""),
            );
        }
    }
    Ok(())
}

fn output_similar_matches_human(value: &serde_json::Value) -> Result<()> {
    println!(
        "Similar to #{:04} {}:",
        value["query"]["id"].as_u64().unwrap_or(0),
        value["query"]["name"].as_str().unwrap_or(""),
    );
    match value["neighbors"].as_array() {
        Some(neighbors) if !neighbors.is_empty() => {
            for entry in neighbors {
                println!(
                    "  #{:04}  {:<30} score {:.4}",
                    entry["id"].as_u64().unwrap_or(0),
                    entry["name"].as_str().unwrap_or(""),
                    entry["score"].as_f64().unwrap_or(0.0),
                );
            }
        }
        _ => println!("  (no similar entries)"),
    }
    Ok(())
}

fn output_catalog_stats_human(value: &serde_json::Value) -> Result<()> {
    println!(
        "Catalog records:  {}",
        value["catalog_records"].as_u64().unwrap_or(0)
    );
    println!(
        "Embeddings:       {}",
        value["embeddings"].as_u64().unwrap_or(0)
    );
    println!(
        "Dimension:        {}",
        value["dimension"].as_u64().unwrap_or(0)
    );
    if let Some(non_unit) = value["non_unit_norms"].as_u64() {
        println!("Non-unit norms:   {non_unit}");
    }
    Ok(())
}
