//! Shared embedding store with atomic install and awaitable readiness.
//!
//! The store is created empty ("pending") at startup. The asynchronous
//! loader later installs a complete [`EmbeddingSet`] in a single swap, so
//! readers never observe a partially populated collection. Readiness is
//! broadcast over a watch channel: callers await a state change instead
//! of polling on a timer.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::embedding::{Embedding, EmbeddingSet};
use crate::error::{KantoError, Result};

/// Load state of the embedding store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// The asynchronous load has not completed yet.
    Pending,
    /// The set is installed and lookups will succeed.
    Ready,
    /// The load failed; the store stays unavailable for the process
    /// lifetime (no automatic retry).
    Failed,
}

/// Shared handle over the embedding collection.
///
/// Cheap to clone via `Arc`; written exactly once (install or fail) and
/// read many times afterwards.
pub struct EmbeddingStore {
    set: RwLock<Option<Arc<EmbeddingSet>>>,
    state_tx: watch::Sender<LoadState>,
}

impl EmbeddingStore {
    /// Create a new, empty store in the pending state.
    pub fn new() -> Arc<Self> {
        let (state_tx, _) = watch::channel(LoadState::Pending);
        Arc::new(Self {
            set: RwLock::new(None),
            state_tx,
        })
    }

    /// The current load state.
    pub fn state(&self) -> LoadState {
        *self.state_tx.borrow()
    }

    /// Whether the set is installed.
    pub fn is_ready(&self) -> bool {
        self.state() == LoadState::Ready
    }

    /// Install a fully built set and flip the store to ready.
    ///
    /// The set is swapped in as a whole before the state change is
    /// broadcast, so a caller that observed `Ready` always sees the
    /// complete collection. A second install (or an install after a
    /// failure) is rejected; the store is single-shot.
    pub fn install(&self, set: EmbeddingSet) -> Result<()> {
        let mut guard = self.set.write();
        if self.state() != LoadState::Pending {
            return Err(KantoError::InvalidOperation(
                "Embedding store has already been installed or failed".to_string(),
            ));
        }
        *guard = Some(Arc::new(set));
        // State check, swap and broadcast share the write lock so the
        // pending -> ready transition is observed exactly once.
        let _ = self.state_tx.send(LoadState::Ready);
        drop(guard);
        Ok(())
    }

    /// Mark the load as permanently failed for this process.
    pub fn fail(&self) {
        let guard = self.set.write();
        if self.state() == LoadState::Pending {
            let _ = self.state_tx.send(LoadState::Failed);
        }
        drop(guard);
    }

    /// Get the installed set, if ready.
    ///
    /// The returned `Arc` is an immutable snapshot: ranking against it is
    /// unaffected by anything the store does afterwards.
    pub fn snapshot(&self) -> Option<Arc<EmbeddingSet>> {
        self.set.read().clone()
    }

    /// Get the embedding for a 1-based entity ID.
    ///
    /// `None` when the store is not ready or the ID is out of range.
    pub fn get(&self, id: u32) -> Option<Embedding> {
        self.snapshot()?.get(id).cloned()
    }

    /// Subscribe to load-state changes.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state_tx.subscribe()
    }

    /// Wait until the store is ready, up to `timeout`.
    ///
    /// Resolves to the installed snapshot when the load completes. A
    /// failed load or an elapsed timeout yields
    /// [`KantoError::EmbeddingsUnavailable`]; callers render that as a
    /// "similarity unavailable" state rather than an application fault.
    pub async fn wait_ready(&self, timeout: Duration) -> Result<Arc<EmbeddingSet>> {
        let mut rx = self.subscribe();
        let wait = async {
            loop {
                match *rx.borrow_and_update() {
                    LoadState::Ready => {
                        return self.snapshot().ok_or_else(|| {
                            KantoError::unavailable("Store ready but no set installed")
                        });
                    }
                    LoadState::Failed => {
                        return Err(KantoError::unavailable("Embedding load failed"));
                    }
                    LoadState::Pending => {}
                }
                if rx.changed().await.is_err() {
                    return Err(KantoError::unavailable("Embedding store dropped"));
                }
            }
        };

        match tokio::time::timeout(timeout, wait).await {
            Ok(result) => result,
            Err(_) => Err(KantoError::timeout(format!(
                "Embeddings not ready after {timeout:?}"
            ))),
        }
    }
}

impl std::fmt::Debug for EmbeddingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingStore")
            .field("state", &self.state())
            .field("len", &self.snapshot().map(|s| s.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> EmbeddingSet {
        EmbeddingSet::build(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap()
    }

    #[test]
    fn test_store_starts_pending() {
        let store = EmbeddingStore::new();
        assert_eq!(store.state(), LoadState::Pending);
        assert!(!store.is_ready());
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_install_flips_ready() {
        let store = EmbeddingStore::new();
        store.install(sample_set()).unwrap();
        assert!(store.is_ready());
        assert_eq!(store.snapshot().unwrap().len(), 2);
    }

    #[test]
    fn test_get_before_ready_is_none_not_a_panic() {
        let store = EmbeddingStore::new();
        assert!(store.get(1).is_none());

        store.install(sample_set()).unwrap();
        assert_eq!(store.get(1).unwrap().data, vec![1.0, 0.0]);
        assert!(store.get(99).is_none());
    }

    #[test]
    fn test_install_is_single_shot() {
        let store = EmbeddingStore::new();
        store.install(sample_set()).unwrap();
        assert!(store.install(sample_set()).is_err());
    }

    #[test]
    fn test_fail_is_permanent() {
        let store = EmbeddingStore::new();
        store.fail();
        assert_eq!(store.state(), LoadState::Failed);
        assert!(store.install(sample_set()).is_err());
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_fail_after_install_is_ignored() {
        let store = EmbeddingStore::new();
        store.install(sample_set()).unwrap();
        store.fail();
        assert_eq!(store.state(), LoadState::Ready);
    }

    #[tokio::test]
    async fn test_wait_ready_resolves_immediately_when_ready() {
        let store = EmbeddingStore::new();
        store.install(sample_set()).unwrap();
        let set = store
            .wait_ready(Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn test_wait_ready_reports_failure() {
        let store = EmbeddingStore::new();
        store.fail();
        let result = store.wait_ready(Duration::from_millis(10)).await;
        assert!(matches!(
            result,
            Err(KantoError::EmbeddingsUnavailable(_))
        ));
    }
}
