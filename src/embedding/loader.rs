//! Asynchronous loading of the serialized embedding source.
//!
//! The source is a JSON array of arrays of floats; array index `i` holds
//! the embedding for entity ID `i + 1`. The load runs once, at startup,
//! fire-and-forget: success installs the set atomically into the store,
//! failure logs the cause and leaves the store permanently unavailable.
//! Neither outcome is fatal to the rest of the application.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::embedding::EmbeddingSet;
use crate::embedding::store::EmbeddingStore;
use crate::error::Result;

/// Read and parse the embedding source file into a validated set.
pub async fn load_embeddings(path: impl AsRef<Path>) -> Result<EmbeddingSet> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let raw: Vec<Vec<f32>> = serde_json::from_slice(&bytes)?;
    log::info!(
        "Loaded {} embeddings from {}",
        raw.len(),
        path.as_ref().display()
    );
    EmbeddingSet::build(raw)
}

/// Parse an embedding source already held in memory.
pub fn parse_embeddings(json: &str) -> Result<EmbeddingSet> {
    let raw: Vec<Vec<f32>> = serde_json::from_str(json)?;
    EmbeddingSet::build(raw)
}

/// Spawn the single startup load for `store`.
///
/// On success the set is installed and the store becomes ready; on
/// failure the error is logged and the store is marked failed with no
/// retry. The returned handle is only needed by tests; the caller may
/// drop it.
pub fn spawn_load(store: Arc<EmbeddingStore>, path: PathBuf) -> JoinHandle<()> {
    tokio::spawn(async move {
        match load_embeddings(&path).await {
            Ok(set) => {
                if let Err(e) = store.install(set) {
                    log::error!("Failed to install embeddings: {e}");
                }
            }
            Err(e) => {
                log::error!("Error loading embeddings from {}: {e}", path.display());
                store.fail();
            }
        }
    })
}
