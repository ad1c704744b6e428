//! Exact top-K ranking by linear scan.
//!
//! No index is built: the corpus is a few thousand embeddings, so a full
//! O(N·D) scan per query is the simplest correct approach. Candidates
//! are scored in store order and stable-sorted descending, which makes
//! tie-breaks deterministic for a given set snapshot.

use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;

use crate::embedding::{Embedding, EmbeddingSet};
use crate::embedding::store::EmbeddingStore;
use crate::error::Result;
use crate::similarity::{SimilarityResult, dot_product};

/// Below this store size, parallel scoring costs more than it saves.
const PARALLEL_THRESHOLD: usize = 1024;

/// Default bound on waiting for the embedding store to become ready.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);

/// Stateless ranker over a single [`EmbeddingSet`] snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityRanker;

impl SimilarityRanker {
    /// Create a new ranker.
    pub fn new() -> Self {
        Self
    }

    /// Rank every other entity in `set` by similarity to `query_id` and
    /// return the top `k`, descending by score.
    ///
    /// An unknown `query_id` (zero or out of range) yields an empty list
    /// plus a diagnostic, never an error. `k = 0` yields an empty list;
    /// `k` larger than the candidate count yields all `N - 1` candidates.
    pub fn rank(&self, set: &EmbeddingSet, query_id: u32, k: usize) -> Vec<SimilarityResult> {
        let Some(query) = set.get(query_id) else {
            log::warn!("No embedding found for entity ID {query_id}");
            return Vec::new();
        };

        if k == 0 {
            return Vec::new();
        }

        let mut scored = self.score_all(set, query_id, &query.data);

        // Stable sort: equal scores keep store order, so repeated calls
        // on one snapshot return identical results.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }

    /// Score every embedding except the query's own position, in store
    /// order.
    fn score_all(&self, set: &EmbeddingSet, query_id: u32, query: &[f32]) -> Vec<SimilarityResult> {
        let score_one = |(id, embedding): (u32, &Embedding)| {
            (id != query_id).then(|| SimilarityResult {
                id,
                score: dot_product(query, &embedding.data),
            })
        };

        if set.len() < PARALLEL_THRESHOLD {
            set.iter().filter_map(score_one).collect()
        } else {
            // Collected in store order, so parallelism does not perturb
            // the stable tie-break.
            let pairs: Vec<(u32, &Embedding)> = set.iter().collect();
            pairs.into_par_iter().filter_map(score_one).collect()
        }
    }
}

/// High-level searcher that couples a store handle with the bounded
/// readiness wait.
///
/// This is the piece presentation code talks to: it absorbs the
/// not-ready state by awaiting the store's load future (up to the
/// configured timeout) instead of asking callers to poll.
pub struct SimilaritySearcher {
    store: Arc<EmbeddingStore>,
    ranker: SimilarityRanker,
    ready_timeout: Duration,
}

impl SimilaritySearcher {
    /// Create a searcher over `store` with the default readiness bound.
    pub fn new(store: Arc<EmbeddingStore>) -> Self {
        Self {
            store,
            ranker: SimilarityRanker::new(),
            ready_timeout: DEFAULT_READY_TIMEOUT,
        }
    }

    /// Override the readiness bound.
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Whether the underlying store is ready.
    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    /// Find the `k` entities most similar to `query_id`.
    ///
    /// Waits for the store to become ready, bounded by the configured
    /// timeout; a failed or overdue load surfaces as
    /// [`EmbeddingsUnavailable`](crate::error::KantoError::EmbeddingsUnavailable).
    pub async fn similar(&self, query_id: u32, k: usize) -> Result<Vec<SimilarityResult>> {
        let set = self.store.wait_ready(self.ready_timeout).await?;
        Ok(self.ranker.rank(&set, query_id, k))
    }
}
