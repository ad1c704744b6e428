//! Command implementations for the Kanto CLI.

use std::time::Duration;

use crate::catalog::{Catalog, PokemonRecord};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::embedding::NORM_TOLERANCE;
use crate::embedding::loader;
use crate::embedding::store::EmbeddingStore;
use crate::error::{KantoError, Result};
use crate::similarity::SimilaritySearcher;

/// Execute a CLI command.
pub fn execute_command(args: KantoArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search_catalog(search_args.clone(), &args),
        Command::Similar(similar_args) => find_similar(similar_args.clone(), &args),
        Command::Stats(stats_args) => show_stats(stats_args.clone(), &args),
    }
}

fn entry(record: &PokemonRecord) -> CatalogEntry {
    let types = match &record.type2 {
        Some(type2) => format!("{}/{}", record.type1, type2),
        None => record.type1.clone(),
    };
    CatalogEntry {
        id: record.id,
        name: record.display_name(),
        types,
    }
}

/// Search the catalog by name, form or type.
fn search_catalog(args: SearchArgs, cli_args: &KantoArgs) -> Result<()> {
    let catalog = Catalog::from_csv_path(&cli_args.data_path)?;

    let matches = catalog.filter(&args.query);
    let total_matches = matches.len();
    let shown: Vec<CatalogEntry> = matches.into_iter().take(args.limit).map(entry).collect();

    output_result(
        "",
        &SearchMatches {
            query: args.query,
            matches: shown,
            total_matches,
        },
        cli_args,
    )
}

/// Find the entries most similar to a catalog ID.
fn find_similar(args: SimilarArgs, cli_args: &KantoArgs) -> Result<()> {
    let catalog = Catalog::from_csv_path(&cli_args.data_path)?;
    let query = catalog
        .get(args.id)
        .ok_or_else(|| KantoError::not_found(format!("No catalog entry with ID {}", args.id)))?;

    let runtime = tokio::runtime::Runtime::new()?;
    let neighbors = runtime.block_on(async {
        let store = EmbeddingStore::new();
        // Startup load: fire-and-forget, observed through the store.
        loader::spawn_load(store.clone(), cli_args.embeddings_path.clone());

        let searcher = SimilaritySearcher::new(store)
            .with_ready_timeout(Duration::from_secs(args.timeout));
        searcher.similar(args.id, args.top_k).await
    });

    let neighbors = match neighbors {
        Ok(neighbors) => neighbors,
        Err(KantoError::EmbeddingsUnavailable(reason)) => {
            // Per the error design this degrades, never crashes.
            eprintln!("Similarity unavailable: {reason}");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let neighbors = neighbors
        .into_iter()
        .map(|result| SimilarEntry {
            id: result.id,
            name: catalog
                .get(result.id)
                .map(|r| r.display_name())
                .unwrap_or_else(|| format!("#{}", result.id)),
            score: result.score,
        })
        .collect();

    output_result(
        "",
        &SimilarMatches {
            query: entry(query),
            neighbors,
        },
        cli_args,
    )
}

/// Show catalog and embedding statistics.
fn show_stats(args: StatsArgs, cli_args: &KantoArgs) -> Result<()> {
    let catalog = Catalog::from_csv_path(&cli_args.data_path)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let set = runtime.block_on(loader::load_embeddings(&cli_args.embeddings_path))?;

    if catalog.len() != set.len() {
        log::warn!(
            "Catalog has {} records but embedding source has {}",
            catalog.len(),
            set.len()
        );
    }

    output_result(
        "",
        &CatalogStats {
            catalog_records: catalog.len(),
            embeddings: set.len(),
            dimension: set.dimension(),
            non_unit_norms: args
                .check_norms
                .then(|| set.count_non_unit_norm(NORM_TOLERANCE)),
        },
        cli_args,
    )
}
