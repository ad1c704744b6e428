//! Similarity scoring over precomputed embeddings.
//!
//! Scores are plain dot products. The upstream embedding pipeline emits
//! unit-normalized vectors, so the dot product equals cosine similarity;
//! nothing here renormalizes, and violating that invariant upstream
//! produces silently wrong rankings (the loader audits norms at install
//! time for exactly that reason).

pub mod ranker;

pub use ranker::{SimilarityRanker, SimilaritySearcher};

use serde::{Deserialize, Serialize};

/// A single similarity match: an entity ID and its score.
///
/// For unit-normalized embeddings the score is a cosine similarity in
/// `[-1, 1]`; unnormalized inputs make it an unbounded dot product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// 1-based entity ID of the matched catalog entry.
    pub id: u32,
    /// Similarity score (higher is more similar).
    pub score: f32,
}

/// Compute the dot product of two equal-length vectors.
///
/// Callers guarantee equal lengths; the embedding set validates a shared
/// dimension at build time, so within a set this always holds.
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product() {
        assert_eq!(dot_product(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(dot_product(&[1.0, 2.0], &[3.0, 4.0]), 11.0);
    }

    #[test]
    fn test_self_similarity_of_unit_vector_is_one() {
        // Boundary sanity check on unit-normalized input data.
        let v = [0.6, 0.8];
        assert!((dot_product(&v, &v) - 1.0).abs() < 1e-6);
    }
}
