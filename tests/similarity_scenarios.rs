use std::time::Duration;

use kanto::embedding::EmbeddingSet;
use kanto::embedding::store::EmbeddingStore;
use kanto::error::Result;
use kanto::similarity::{SimilarityRanker, SimilaritySearcher};

/// Three unit vectors: entity 2 is close to entity 1, entity 3 opposite.
fn build_sample_set() -> Result<EmbeddingSet> {
    EmbeddingSet::build(vec![
        vec![1.0, 0.0],
        vec![0.9, 0.436],
        vec![-1.0, 0.0],
    ])
}

/// A larger set of unit vectors spread around the circle.
fn build_circle_set(n: usize) -> Result<EmbeddingSet> {
    let raw = (0..n)
        .map(|i| {
            let angle = i as f32 / n as f32 * std::f32::consts::TAU;
            vec![angle.cos(), angle.sin()]
        })
        .collect();
    EmbeddingSet::build(raw)
}

#[test]
fn rank_returns_expected_neighbors_for_worked_example() -> Result<()> {
    let set = build_sample_set()?;
    let results = SimilarityRanker::new().rank(&set, 1, 2);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 2);
    assert!((results[0].score - 0.9).abs() < 1e-6);
    assert_eq!(results[1].id, 3);
    assert!((results[1].score - (-1.0)).abs() < 1e-6);
    Ok(())
}

#[test]
fn rank_result_length_is_min_of_k_and_candidates() -> Result<()> {
    let set = build_circle_set(16)?;
    let ranker = SimilarityRanker::new();

    for k in [0, 1, 5, 15, 16, 100] {
        let results = ranker.rank(&set, 7, k);
        assert_eq!(results.len(), k.min(set.len() - 1));
    }
    Ok(())
}

#[test]
fn rank_never_returns_the_query_itself() -> Result<()> {
    let set = build_circle_set(16)?;
    let ranker = SimilarityRanker::new();

    for id in 1..=16 {
        assert!(ranker.rank(&set, id, 16).iter().all(|r| r.id != id));
    }
    Ok(())
}

#[test]
fn rank_scores_are_monotonically_non_increasing() -> Result<()> {
    let set = build_circle_set(32)?;
    let results = SimilarityRanker::new().rank(&set, 1, 31);

    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    Ok(())
}

#[test]
fn rank_is_deterministic_across_calls() -> Result<()> {
    let set = build_circle_set(32)?;
    let ranker = SimilarityRanker::new();

    let first = ranker.rank(&set, 5, 10);
    for _ in 0..5 {
        assert_eq!(ranker.rank(&set, 5, 10), first);
    }
    Ok(())
}

#[test]
fn rank_handles_tiny_store_without_error() -> Result<()> {
    let set = EmbeddingSet::build(vec![vec![1.0, 0.0], vec![0.0, 1.0]])?;
    let results = SimilarityRanker::new().rank(&set, 1, 6);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 2);
    Ok(())
}

#[test]
fn rank_with_unknown_query_is_empty_not_an_error() -> Result<()> {
    let set = build_sample_set()?;
    let ranker = SimilarityRanker::new();

    assert!(ranker.rank(&set, 0, 6).is_empty());
    assert!(ranker.rank(&set, 999, 6).is_empty());
    Ok(())
}

#[tokio::test]
async fn searcher_ranks_once_store_is_installed() -> Result<()> {
    let store = EmbeddingStore::new();
    store.install(build_sample_set()?)?;

    let searcher = SimilaritySearcher::new(store);
    let results = searcher.similar(1, 2).await?;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 2);
    Ok(())
}

#[tokio::test]
async fn searcher_reports_unavailable_after_failed_load() -> Result<()> {
    let store = EmbeddingStore::new();
    store.fail();

    let searcher =
        SimilaritySearcher::new(store).with_ready_timeout(Duration::from_millis(50));
    assert!(searcher.similar(1, 2).await.is_err());
    Ok(())
}
