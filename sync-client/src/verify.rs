//! Read-back verification against the local cache.

use userlist_sync_core::{verify_snapshot, Verification, VerificationMode};
use userlist_sync_types::Snapshot;

use crate::cache::LocalCacheStore;
use crate::store::KeyValueStore;

/// Detects silent write corruption by re-reading what was just persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationEngine {
    mode: VerificationMode,
}

impl VerificationEngine {
    /// Create an engine using `mode`.
    pub fn new(mode: VerificationMode) -> Self {
        Self { mode }
    }

    /// The configured mode.
    pub fn mode(&self) -> VerificationMode {
        self.mode
    }

    /// Compare `fetched` with the snapshot currently in `cache`.
    pub async fn verify<K: KeyValueStore>(
        &self,
        cache: &LocalCacheStore<K>,
        fetched: &Snapshot,
    ) -> Verification {
        let persisted = cache.read().await;
        verify_snapshot(fetched, persisted.as_ref(), self.mode)
    }
}
