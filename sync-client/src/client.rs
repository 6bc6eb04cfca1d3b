//! SyncController - the main interface for userlist-sync.
//!
//! This module provides [`SyncController`], which runs one offline-first
//! synchronization cycle per call and owns the displayed [`SyncState`].
//!
//! # Architecture
//!
//! SyncController uses a pure state machine (from sync-core) for the cycle
//! logic and interprets its actions to perform I/O against a
//! [`RemoteDataSource`] and a [`LocalCacheStore`].
//!
//! ```text
//! Caller → SyncController → RemoteDataSource → Network
//!               │    ↓
//!               │  sync-core (pure cycle state machine)
//!               ↓
//!        LocalCacheStore → KeyValueStore
//! ```
//!
//! # Example
//!
//! ```ignore
//! use userlist_sync_client::{LoadMode, MemoryStore, MockRemote, SyncConfig, SyncController};
//!
//! let controller = SyncController::new(SyncConfig::default(), MockRemote::new(), MemoryStore::new());
//! let state = controller.load(LoadMode::Initial).await?;
//! if let Some(prompt) = state.prompt() {
//!     // present prompt, then controller.respond(picked_action)
//! }
//! ```

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use userlist_sync_core::{
    Action, CycleStep, Dispatch, Event, LoadMode, PromptAction, SyncState, VerificationMode,
};

use crate::cache::{CacheError, CacheKeys, LocalCacheStore};
use crate::remote::RemoteDataSource;
use crate::store::KeyValueStore;
use crate::verify::VerificationEngine;

/// Controller errors.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Another cycle is still running on this controller.
    #[error("a sync cycle is already in progress")]
    CycleInProgress,

    /// Clearing the local cache failed.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Configuration for SyncController.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfig {
    /// Keys the snapshot is stored under.
    pub cache_keys: CacheKeys,
    /// How thoroughly persisted snapshots are checked.
    pub verification: VerificationMode,
}

impl SyncConfig {
    /// Set the storage keys.
    pub fn with_cache_keys(mut self, keys: CacheKeys) -> Self {
        self.cache_keys = keys;
        self
    }

    /// Set the verification mode.
    pub fn with_verification(mut self, mode: VerificationMode) -> Self {
        self.verification = mode;
        self
    }
}

/// The offline-first sync controller.
///
/// Only one cycle runs at a time; a call made while one is pending is
/// rejected with [`ControllerError::CycleInProgress`].
pub struct SyncController<R: RemoteDataSource, K: KeyValueStore> {
    remote: R,
    cache: LocalCacheStore<K>,
    verifier: VerificationEngine,
    state: Arc<Mutex<SyncState>>,
    cycle: Mutex<()>,
}

impl<R: RemoteDataSource, K: KeyValueStore> SyncController<R, K> {
    /// Create a new SyncController in the Idle state.
    pub fn new(config: SyncConfig, remote: R, store: K) -> Self {
        Self {
            remote,
            cache: LocalCacheStore::new(store, config.cache_keys),
            verifier: VerificationEngine::new(config.verification),
            state: Arc::new(Mutex::new(SyncState::idle())),
            cycle: Mutex::new(()),
        }
    }

    /// The currently displayed state.
    ///
    /// While a cycle runs this is its in-flight `Loading`/`Refreshing` state.
    pub async fn state(&self) -> SyncState {
        self.state.lock().await.clone()
    }

    /// Run one synchronization cycle.
    ///
    /// Fetches from the remote; on success persists and verifies, on failure
    /// falls back to the last stored snapshot. Returns the final state,
    /// which is also what [`state()`](Self::state) reports afterwards.
    pub async fn load(&self, mode: LoadMode) -> Result<SyncState, ControllerError> {
        let _cycle = self
            .cycle
            .try_lock()
            .map_err(|_| ControllerError::CycleInProgress)?;
        Ok(self.run_cycle(mode).await)
    }

    /// Run an initial-mode cycle again.
    pub async fn retry(&self) -> Result<SyncState, ControllerError> {
        self.load(LoadMode::Initial).await
    }

    /// Empty the local cache, drop displayed records and load again.
    ///
    /// If the following fetch fails the result is a no-data error; the
    /// cleared snapshot is never reused.
    pub async fn clear_cache(&self) -> Result<SyncState, ControllerError> {
        let _cycle = self
            .cycle
            .try_lock()
            .map_err(|_| ControllerError::CycleInProgress)?;

        self.cache.clear().await?;
        self.publish(SyncState::idle()).await;
        tracing::info!("local cache cleared");

        Ok(self.run_cycle(LoadMode::Initial).await)
    }

    /// Act on the action picked from a prompt.
    ///
    /// Returns the new state if the action started a cycle, `None` if it
    /// only dismissed the prompt.
    pub async fn respond(
        &self,
        action: PromptAction,
    ) -> Result<Option<SyncState>, ControllerError> {
        match action.dispatch() {
            Dispatch::Retry => self.retry().await.map(Some),
            Dispatch::Dismiss => Ok(None),
        }
    }

    /// The local cache (for read-only views such as status).
    pub fn cache(&self) -> &LocalCacheStore<K> {
        &self.cache
    }

    /// Get a reference to the underlying remote (for testing).
    pub fn remote(&self) -> &R {
        &self.remote
    }

    async fn run_cycle(&self, mode: LoadMode) -> SyncState {
        let (mut step, in_flight, mut action) = CycleStep::begin(mode);
        tracing::info!(?mode, "sync cycle started");
        self.publish(in_flight).await;

        let state = loop {
            let event = self.execute(action).await;
            match step.on_event(event) {
                (CycleStep::Finished(state), _) => break state,
                (next, Some(next_action)) => {
                    step = next;
                    action = next_action;
                }
                (stalled, None) => {
                    tracing::error!(step = ?stalled, "sync cycle stalled");
                    break SyncState::no_data("sync cycle stalled");
                }
            }
        };

        debug_assert!(state.is_consistent(), "inconsistent state: {:?}", state);
        tracing::info!(
            phase = ?state.phase(),
            records = state.records().len(),
            offline = state.is_offline(),
            issue = ?state.error_kind(),
            "sync cycle finished"
        );
        self.publish(state.clone()).await;
        state
    }

    /// Perform one action and report its result as an event.
    async fn execute(&self, action: Action) -> Event {
        match action {
            Action::Fetch => match self.remote.fetch().await {
                Ok(snapshot) => {
                    tracing::debug!(records = snapshot.len(), "remote fetch succeeded");
                    Event::FetchSucceeded { snapshot }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "remote fetch failed, falling back to cache");
                    Event::FetchFailed {
                        error: e.to_string(),
                    }
                }
            },
            Action::Persist { snapshot } => match self.cache.persist(&snapshot).await {
                Ok(()) => Event::PersistSucceeded,
                Err(e) => {
                    tracing::warn!(error = %e, "persisting snapshot failed");
                    Event::PersistFailed {
                        error: e.to_string(),
                    }
                }
            },
            Action::Verify { snapshot } => {
                let outcome = self.verifier.verify(&self.cache, &snapshot).await;
                if let Some(reason) = outcome.describe() {
                    tracing::warn!(%reason, "persisted snapshot failed verification");
                }
                Event::Verified { outcome }
            }
            Action::ReadCache => {
                let snapshot = self.cache.read().await;
                tracing::debug!(
                    records = snapshot.as_ref().map(|s| s.len()),
                    "cache fallback read"
                );
                Event::CacheRead { snapshot }
            }
        }
    }

    async fn publish(&self, state: SyncState) {
        *self.state.lock().await = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{MockRemote, RemoteError};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use tokio::sync::Notify;
    use userlist_sync_core::{ErrorKind, SyncPhase};
    use userlist_sync_types::{Address, Company, Snapshot, UserRecord};

    fn user(id: u64, name: &str) -> UserRecord {
        UserRecord {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".to_string(),
            website: "example.com".to_string(),
            company: Company {
                name: "Acme".to_string(),
            },
            address: Address {
                street: "Main St".to_string(),
                suite: "Apt. 1".to_string(),
                city: "Springfield".to_string(),
                zipcode: "12345".to_string(),
            },
        }
    }

    fn controller(
        remote: &MockRemote,
        store: &MemoryStore,
    ) -> SyncController<MockRemote, MemoryStore> {
        SyncController::new(SyncConfig::default(), remote.clone(), store.clone())
    }

    /// Seed the store as if a previous cycle had succeeded.
    async fn seed(store: &MemoryStore, users: Vec<UserRecord>) {
        let cache = LocalCacheStore::new(store.clone(), CacheKeys::default());
        cache.persist(&Snapshot::capture(users)).await.unwrap();
    }

    // ===========================================
    // Configuration Tests
    // ===========================================

    #[test]
    fn config_builder_pattern() {
        let keys = CacheKeys {
            records: "r".into(),
            timestamp: "t".into(),
        };
        let config = SyncConfig::default()
            .with_cache_keys(keys.clone())
            .with_verification(VerificationMode::Full);

        assert_eq!(config.cache_keys, keys);
        assert_eq!(config.verification, VerificationMode::Full);
    }

    #[tokio::test]
    async fn starts_idle() {
        let c = controller(&MockRemote::new(), &MemoryStore::new());
        let state = c.state().await;
        assert_eq!(state.phase(), SyncPhase::Idle);
        assert!(state.records().is_empty());
    }

    // ===========================================
    // Scenarios
    // ===========================================

    #[tokio::test]
    async fn scenario_a_fresh_fetch_is_ready() {
        let remote = MockRemote::with_users(vec![user(1, "Ana")]);
        let store = MemoryStore::new();
        let c = controller(&remote, &store);

        let state = c.load(LoadMode::Initial).await.unwrap();

        assert_eq!(state.phase(), SyncPhase::Ready);
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.records()[0].name, "Ana");
        assert!(!state.is_offline());
        assert!(state.error_message().is_none());
        assert_eq!(c.state().await, state);
        // The fetched snapshot is now the persisted one
        assert_eq!(c.cache().read().await.unwrap().records(), state.records());
    }

    #[tokio::test]
    async fn scenario_b_remote_down_falls_back_to_cache() {
        let remote = MockRemote::new();
        let store = MemoryStore::new();
        seed(&store, vec![user(1, "Ana"), user(2, "Bo")]).await;
        let c = controller(&remote, &store);

        let state = c.load(LoadMode::Initial).await.unwrap();

        assert_eq!(state.phase(), SyncPhase::Offline);
        assert!(state.is_offline());
        assert_eq!(state.records().len(), 2);
        assert_eq!(state.error_kind(), Some(ErrorKind::Remote));
        assert!(state.error_message().is_some());
    }

    #[tokio::test]
    async fn scenario_c_remote_down_and_empty_cache_is_no_data() {
        let c = controller(&MockRemote::new(), &MemoryStore::new());

        let state = c.load(LoadMode::Initial).await.unwrap();

        assert_eq!(state.phase(), SyncPhase::Error);
        assert!(state.records().is_empty());
        assert_eq!(state.error_kind(), Some(ErrorKind::NoData));
        assert!(!state.is_offline());
    }

    #[tokio::test]
    async fn scenario_d_persist_failure_keeps_fetched_record() {
        let remote = MockRemote::with_users(vec![user(1, "Ana")]);
        let store = MemoryStore::new();
        store.fail_next_set("quota exceeded");
        let c = controller(&remote, &store);

        let state = c.load(LoadMode::Initial).await.unwrap();

        assert_eq!(state.phase(), SyncPhase::Error);
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.error_kind(), Some(ErrorKind::StorageWrite));
        assert!(!state.is_offline());
    }

    // ===========================================
    // Properties
    // ===========================================

    #[tokio::test]
    async fn verification_failure_is_advisory() {
        let fetched = vec![user(1, "Ana"), user(2, "Bo")];
        let remote = MockRemote::with_users(fetched.clone());
        let store = MemoryStore::new();
        // The records write silently stores something else
        store.corrupt_next_set("[]");
        let c = controller(&remote, &store);

        let state = c.load(LoadMode::Refresh).await.unwrap();

        assert_eq!(state.phase(), SyncPhase::Ready);
        assert_eq!(state.records(), fetched.as_slice());
        assert_eq!(state.error_kind(), Some(ErrorKind::Verification));
        assert!(state.error_message().is_some());
    }

    #[tokio::test]
    async fn unreadable_cache_is_treated_as_empty() {
        let store = MemoryStore::new();
        seed(&store, vec![user(1, "Ana")]).await;
        store.fail_next_get("io error");
        let c = controller(&MockRemote::new(), &store);

        let state = c.load(LoadMode::Initial).await.unwrap();
        assert_eq!(state.error_kind(), Some(ErrorKind::NoData));
    }

    #[tokio::test]
    async fn successful_fetch_replaces_cached_snapshot() {
        let remote = MockRemote::with_users(vec![user(7, "Cy")]);
        let store = MemoryStore::new();
        seed(&store, vec![user(1, "Ana"), user(2, "Bo")]).await;
        let c = controller(&remote, &store);

        c.load(LoadMode::Initial).await.unwrap();

        let cached = c.cache().read().await.unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached.records()[0].id, 7);
    }

    #[tokio::test]
    async fn half_written_snapshot_never_reaches_fallback() {
        let remote = MockRemote::with_users(vec![user(1, "Ana"), user(2, "Bo")]);
        let store = MemoryStore::new();
        let c = controller(&remote, &store);
        let saved = c.load(LoadMode::Initial).await.unwrap();

        remote.set_users(vec![user(9, "Zed")]);
        store.fail_next_set_on("userlist.timestamp", "disk full");
        let state = c.load(LoadMode::Refresh).await.unwrap();
        assert_eq!(state.error_kind(), Some(ErrorKind::StorageWrite));
        assert_eq!(state.records()[0].id, 9);

        remote.go_offline();
        let state = c.load(LoadMode::Refresh).await.unwrap();
        assert_eq!(state.phase(), SyncPhase::Offline);
        assert_eq!(state.snapshot(), saved.snapshot());
    }

    #[tokio::test]
    async fn offline_cycle_does_not_touch_cache() {
        let store = MemoryStore::new();
        seed(&store, vec![user(1, "Ana")]).await;
        let before = store.peek("userlist.records");
        let c = controller(&MockRemote::new(), &store);

        c.load(LoadMode::Initial).await.unwrap();
        assert_eq!(store.peek("userlist.records"), before);
    }

    // ===========================================
    // Retry / Respond
    // ===========================================

    #[tokio::test]
    async fn retry_recovers_after_remote_returns() {
        let remote = MockRemote::new();
        let c = controller(&remote, &MemoryStore::new());

        let state = c.load(LoadMode::Initial).await.unwrap();
        assert_eq!(state.error_kind(), Some(ErrorKind::NoData));

        remote.set_users(vec![user(1, "Ana")]);
        let state = c.retry().await.unwrap();
        assert_eq!(state.phase(), SyncPhase::Ready);
        assert!(state.issue().is_none());
        assert_eq!(remote.fetch_count(), 2);
    }

    #[tokio::test]
    async fn retry_from_ready_is_safe() {
        let remote = MockRemote::with_users(vec![user(1, "Ana")]);
        let c = controller(&remote, &MemoryStore::new());

        let first = c.load(LoadMode::Initial).await.unwrap();
        let second = c.retry().await.unwrap();
        assert_eq!(first.phase(), second.phase());
        assert_eq!(first.records(), second.records());
    }

    #[tokio::test]
    async fn respond_dispatches_only_retry() {
        let remote = MockRemote::new();
        let c = controller(&remote, &MemoryStore::new());
        c.load(LoadMode::Initial).await.unwrap();
        assert_eq!(remote.fetch_count(), 1);

        assert!(c.respond(PromptAction::Cancel).await.unwrap().is_none());
        assert!(c.respond(PromptAction::Continue).await.unwrap().is_none());
        assert!(c.respond(PromptAction::Acknowledge).await.unwrap().is_none());
        assert_eq!(remote.fetch_count(), 1);

        let state = c.respond(PromptAction::Retry).await.unwrap();
        assert!(state.is_some());
        assert_eq!(remote.fetch_count(), 2);
    }

    #[tokio::test]
    async fn prompt_is_single_per_failed_cycle() {
        let c = controller(&MockRemote::new(), &MemoryStore::new());
        let state = c.load(LoadMode::Initial).await.unwrap();
        let prompt = state.prompt().unwrap();
        assert_eq!(prompt.kind, ErrorKind::NoData);
        assert_eq!(prompt.actions, &[PromptAction::Retry, PromptAction::Cancel]);
    }

    // ===========================================
    // Clear Cache
    // ===========================================

    #[tokio::test]
    async fn clear_cache_then_failed_fetch_is_no_data() {
        let remote = MockRemote::with_users(vec![user(1, "Ana")]);
        let store = MemoryStore::new();
        let c = controller(&remote, &store);
        c.load(LoadMode::Initial).await.unwrap();

        remote.go_offline();
        let state = c.clear_cache().await.unwrap();

        assert_eq!(state.phase(), SyncPhase::Error);
        assert_eq!(state.error_kind(), Some(ErrorKind::NoData));
        assert!(state.records().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn clear_cache_reloads_from_remote() {
        let remote = MockRemote::with_users(vec![user(1, "Ana")]);
        let store = MemoryStore::new();
        seed(&store, vec![user(5, "Old")]).await;
        let c = controller(&remote, &store);

        let state = c.clear_cache().await.unwrap();
        assert_eq!(state.phase(), SyncPhase::Ready);
        assert_eq!(state.records()[0].id, 1);
    }

    #[tokio::test]
    async fn clear_cache_twice_does_not_fail() {
        let store = MemoryStore::new();
        let c = controller(&MockRemote::new(), &store);

        c.clear_cache().await.unwrap();
        assert!(store.is_empty());
        c.clear_cache().await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn clear_cache_store_failure_is_reported() {
        let store = MemoryStore::new();
        store.fail_next_remove("locked");
        let c = controller(&MockRemote::new(), &store);

        let result = c.clear_cache().await;
        assert!(matches!(result, Err(ControllerError::Cache(_))));
        // The guard is released; the next call runs
        assert!(c.clear_cache().await.is_ok());
    }

    // ===========================================
    // Concurrency Guard
    // ===========================================

    /// Remote whose fetch blocks until released.
    struct GatedRemote {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl RemoteDataSource for GatedRemote {
        async fn fetch(&self) -> Result<Snapshot, RemoteError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(Snapshot::capture(vec![user(1, "Ana")]))
        }
    }

    #[tokio::test]
    async fn overlapping_load_is_rejected() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let remote = GatedRemote {
            started: started.clone(),
            release: release.clone(),
        };
        let c = Arc::new(SyncController::new(
            SyncConfig::default(),
            remote,
            MemoryStore::new(),
        ));

        let first = {
            let c = Arc::clone(&c);
            tokio::spawn(async move { c.load(LoadMode::Initial).await })
        };
        started.notified().await;

        // While the first cycle is pending, only the in-flight state is visible
        let during = c.state().await;
        assert_eq!(during.phase(), SyncPhase::Loading);
        assert!(during.records().is_empty());

        assert!(matches!(
            c.load(LoadMode::Refresh).await,
            Err(ControllerError::CycleInProgress)
        ));
        assert!(matches!(
            c.clear_cache().await,
            Err(ControllerError::CycleInProgress)
        ));

        release.notify_one();
        let state = first.await.unwrap().unwrap();
        assert_eq!(state.phase(), SyncPhase::Ready);

        // Once finished, a new cycle is accepted
        release.notify_one();
        assert!(c.load(LoadMode::Refresh).await.is_ok());
    }

    #[test]
    fn controller_error_display() {
        assert_eq!(
            ControllerError::CycleInProgress.to_string(),
            "a sync cycle is already in progress"
        );
    }
}
