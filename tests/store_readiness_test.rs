use std::sync::Arc;
use std::time::Duration;

use kanto::embedding::EmbeddingSet;
use kanto::embedding::store::{EmbeddingStore, LoadState};
use kanto::error::{KantoError, Result};
use kanto::similarity::SimilaritySearcher;

fn sample_set() -> Result<EmbeddingSet> {
    EmbeddingSet::build(vec![vec![1.0, 0.0], vec![0.9, 0.436], vec![-1.0, 0.0]])
}

fn install_after(store: Arc<EmbeddingStore>, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        store
            .install(sample_set().expect("sample set builds"))
            .expect("single install succeeds");
    });
}

#[tokio::test(start_paused = true)]
async fn wait_ready_resolves_once_delayed_load_lands() -> Result<()> {
    let store = EmbeddingStore::new();
    assert_eq!(store.state(), LoadState::Pending);

    // Simulate a load that completes well after the first request.
    install_after(store.clone(), Duration::from_millis(300));

    let set = store.wait_ready(Duration::from_secs(5)).await?;
    assert_eq!(set.len(), 3);
    assert!(store.is_ready());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn wait_ready_times_out_when_load_never_completes() {
    let store = EmbeddingStore::new();

    let result = store.wait_ready(Duration::from_secs(2)).await;
    assert!(matches!(result, Err(KantoError::EmbeddingsUnavailable(_))));

    // The store itself stays pending; the bound is the caller's.
    assert_eq!(store.state(), LoadState::Pending);
}

#[tokio::test(start_paused = true)]
async fn wait_ready_reports_delayed_failure() {
    let store = EmbeddingStore::new();

    let failing = store.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        failing.fail();
    });

    let result = store.wait_ready(Duration::from_secs(5)).await;
    assert!(matches!(result, Err(KantoError::EmbeddingsUnavailable(_))));
    assert_eq!(store.state(), LoadState::Failed);
}

#[tokio::test(start_paused = true)]
async fn all_waiters_observe_a_single_install() -> Result<()> {
    let store = EmbeddingStore::new();
    install_after(store.clone(), Duration::from_millis(100));

    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.wait_ready(Duration::from_secs(5)).await })
        })
        .collect();

    for waiter in waiters {
        let set = waiter.await.expect("waiter task completes")?;
        assert_eq!(set.len(), 3);
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn searcher_call_before_readiness_succeeds_after_delayed_load() -> Result<()> {
    let store = EmbeddingStore::new();
    install_after(store.clone(), Duration::from_millis(400));

    // Called while the store is still pending; must not error, must
    // resolve once the load lands.
    let searcher = SimilaritySearcher::new(store).with_ready_timeout(Duration::from_secs(5));
    assert!(!searcher.is_ready());

    let results = searcher.similar(1, 2).await?;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn searcher_surfaces_unavailable_after_bound_exceeded() {
    let store = EmbeddingStore::new();

    let searcher =
        SimilaritySearcher::new(store).with_ready_timeout(Duration::from_millis(500));
    let result = searcher.similar(1, 2).await;
    assert!(matches!(result, Err(KantoError::EmbeddingsUnavailable(_))));
}

#[tokio::test]
async fn snapshot_is_stable_across_later_reads() -> Result<()> {
    let store = EmbeddingStore::new();
    store.install(sample_set()?)?;

    let snapshot = store.snapshot().expect("ready store has a snapshot");
    let again = store.snapshot().expect("ready store has a snapshot");
    assert!(Arc::ptr_eq(&snapshot, &again));
    Ok(())
}
