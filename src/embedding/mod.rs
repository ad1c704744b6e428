//! Embedding vectors and the in-memory store that holds them.
//!
//! This module provides:
//! - A dense [`Embedding`] vector type for similarity computation
//! - The immutable [`EmbeddingSet`] collection, indexed by entity ID
//! - An [`EmbeddingStore`](store::EmbeddingStore) handle with atomic
//!   install and awaitable readiness
//! - An async [`loader`] for the serialized embedding source

pub mod loader;
pub mod store;

use serde::{Deserialize, Serialize};

use crate::error::{KantoError, Result};

/// Tolerance used when auditing whether an embedding is unit-normalized.
pub const NORM_TOLERANCE: f32 = 1e-3;

/// A dense embedding vector for one catalog entity.
///
/// Upstream embedding generation (CLIP image encoding) produces these
/// pre-normalized to unit length; similarity computation relies on that
/// and does not renormalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// The vector dimensions as floating point values.
    pub data: Vec<f32>,
}

impl Embedding {
    /// Create a new embedding with the given dimensions.
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Get the dimensionality of this embedding.
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Calculate the L2 norm (magnitude) of this embedding.
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Normalize this embedding to unit length.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.data {
                *value /= norm;
            }
        }
    }

    /// Check whether this embedding is unit-normalized within `tolerance`.
    pub fn is_unit_norm(&self, tolerance: f32) -> bool {
        (self.norm() - 1.0).abs() <= tolerance
    }

    /// Check if this embedding contains any NaN or infinite values.
    pub fn is_valid(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Validate that this embedding has the expected dimension.
    pub fn validate_dimension(&self, expected_dim: usize) -> Result<()> {
        if self.data.len() != expected_dim {
            return Err(KantoError::Embedding(format!(
                "Embedding dimension mismatch: expected {}, got {}",
                expected_dim,
                self.data.len()
            )));
        }
        Ok(())
    }
}

/// An immutable, position-indexed collection of embeddings.
///
/// Position `i` holds the embedding for entity ID `i + 1` — IDs are
/// 1-based, contiguous and dense, mirroring the catalog. Built once by
/// the loader and shared read-only for the rest of the process.
#[derive(Debug, Clone)]
pub struct EmbeddingSet {
    embeddings: Vec<Embedding>,
    dimension: usize,
}

impl EmbeddingSet {
    /// Build a set from raw vectors, validating the shared-dimension
    /// invariant the serialized source itself never checks.
    ///
    /// Non-unit norms are audited and reported via the diagnostic channel
    /// but do not fail the build; the vectors are used as-is so scores
    /// reproduce the upstream rankings.
    pub fn build(raw: Vec<Vec<f32>>) -> Result<Self> {
        if raw.is_empty() {
            return Err(KantoError::embedding("Embedding source is empty"));
        }

        let dimension = raw[0].len();
        if dimension == 0 {
            return Err(KantoError::embedding("Embeddings have zero dimension"));
        }

        let mut embeddings = Vec::with_capacity(raw.len());
        let mut non_unit = 0usize;
        for (i, data) in raw.into_iter().enumerate() {
            let embedding = Embedding::new(data);
            embedding.validate_dimension(dimension).map_err(|_| {
                KantoError::Embedding(format!(
                    "Embedding at position {} (entity ID {}) has dimension {}, expected {}",
                    i,
                    i + 1,
                    embedding.dimension(),
                    dimension
                ))
            })?;
            if !embedding.is_valid() {
                return Err(KantoError::Embedding(format!(
                    "Embedding for entity ID {} contains non-finite values",
                    i + 1
                )));
            }
            if !embedding.is_unit_norm(NORM_TOLERANCE) {
                non_unit += 1;
            }
            embeddings.push(embedding);
        }

        if non_unit > 0 {
            log::warn!(
                "{non_unit} of {} embeddings are not unit-normalized; \
                 dot-product scores will not be cosine similarities",
                embeddings.len()
            );
        }

        Ok(Self {
            embeddings,
            dimension,
        })
    }

    /// Get the embedding for the given 1-based entity ID.
    ///
    /// Returns `None` when `id` is zero or past the end of the set;
    /// an out-of-range ID is never an error here.
    pub fn get(&self, id: u32) -> Option<&Embedding> {
        if id == 0 {
            return None;
        }
        self.embeddings.get(id as usize - 1)
    }

    /// The number of embeddings in the set.
    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// The shared dimensionality of all embeddings in the set.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Iterate over `(entity ID, embedding)` pairs in store order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Embedding)> {
        self.embeddings
            .iter()
            .enumerate()
            .map(|(i, e)| (i as u32 + 1, e))
    }

    /// Count embeddings whose norm deviates from 1.0 beyond `tolerance`.
    pub fn count_non_unit_norm(&self, tolerance: f32) -> usize {
        self.embeddings
            .iter()
            .filter(|e| !e.is_unit_norm(tolerance))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_norm() {
        let embedding = Embedding::new(vec![3.0, 4.0]);
        assert!((embedding.norm() - 5.0).abs() < 1e-6);
        assert!(!embedding.is_unit_norm(NORM_TOLERANCE));

        let unit = Embedding::new(vec![0.6, 0.8]);
        assert!(unit.is_unit_norm(NORM_TOLERANCE));
    }

    #[test]
    fn test_embedding_normalize() {
        let mut embedding = Embedding::new(vec![3.0, 4.0]);
        embedding.normalize();
        assert!(embedding.is_unit_norm(1e-6));

        // Zero vectors stay zero instead of dividing by zero.
        let mut zero = Embedding::new(vec![0.0, 0.0]);
        zero.normalize();
        assert_eq!(zero.data, vec![0.0, 0.0]);
    }

    #[test]
    fn test_embedding_is_valid() {
        assert!(Embedding::new(vec![1.0, 0.0]).is_valid());
        assert!(!Embedding::new(vec![f32::NAN, 0.0]).is_valid());
        assert!(!Embedding::new(vec![f32::INFINITY, 0.0]).is_valid());
    }

    #[test]
    fn test_set_build_and_get() {
        let set = EmbeddingSet::build(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.dimension(), 2);

        // IDs are 1-based.
        assert_eq!(set.get(1).unwrap().data, vec![1.0, 0.0]);
        assert_eq!(set.get(2).unwrap().data, vec![0.0, 1.0]);
        assert!(set.get(0).is_none());
        assert!(set.get(3).is_none());
    }

    #[test]
    fn test_set_rejects_dimension_mismatch() {
        let result = EmbeddingSet::build(vec![vec![1.0, 0.0], vec![0.5]]);
        assert!(matches!(result, Err(KantoError::Embedding(_))));
    }

    #[test]
    fn test_set_rejects_non_finite() {
        let result = EmbeddingSet::build(vec![vec![1.0, 0.0], vec![f32::NAN, 0.0]]);
        assert!(matches!(result, Err(KantoError::Embedding(_))));
    }

    #[test]
    fn test_set_rejects_empty_source() {
        assert!(EmbeddingSet::build(Vec::new()).is_err());
    }

    #[test]
    fn test_set_norm_audit() {
        let set = EmbeddingSet::build(vec![vec![1.0, 0.0], vec![2.0, 0.0]]).unwrap();
        assert_eq!(set.count_non_unit_norm(NORM_TOLERANCE), 1);
    }
}
