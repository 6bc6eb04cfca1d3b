//! Local cache of the last-known-good snapshot.
//!
//! [`LocalCacheStore`] adapts any [`KeyValueStore`] to snapshot semantics
//! using two configured keys: one for the JSON record list, one for the
//! ISO-8601 capture timestamp. Each successful persist replaces the previous
//! snapshot; no history is kept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use userlist_sync_types::{parse_timestamp, Snapshot, TypesError};

use crate::store::{KeyValueStore, StoreError};

/// Cache layer errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The underlying store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The snapshot could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] TypesError),
}

/// The two storage keys a snapshot lives under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKeys {
    /// Key of the JSON-encoded record list (default: `userlist.records`).
    #[serde(default = "default_records_key")]
    pub records: String,
    /// Key of the ISO-8601 write timestamp (default: `userlist.timestamp`).
    #[serde(default = "default_timestamp_key")]
    pub timestamp: String,
}

fn default_records_key() -> String {
    "userlist.records".to_string()
}

fn default_timestamp_key() -> String {
    "userlist.timestamp".to_string()
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self {
            records: default_records_key(),
            timestamp: default_timestamp_key(),
        }
    }
}

/// Snapshot persistence on top of a key-value store.
#[derive(Debug, Clone)]
pub struct LocalCacheStore<K> {
    store: K,
    keys: CacheKeys,
}

impl<K: KeyValueStore> LocalCacheStore<K> {
    /// Wrap `store`, using `keys` for the two snapshot parts.
    pub fn new(store: K, keys: CacheKeys) -> Self {
        Self { store, keys }
    }

    /// Replace the persisted snapshot with `snapshot`.
    ///
    /// Writes the records first and the timestamp second. Any failure is
    /// returned so the caller can branch on it. If the timestamp write fails
    /// the previous records are put back, so the stored pair never mixes two
    /// snapshots.
    pub async fn persist(&self, snapshot: &Snapshot) -> Result<(), CacheError> {
        let records = snapshot.encode_records()?;
        let previous = self.store.get(&self.keys.records).await;
        self.store.set(&self.keys.records, &records).await?;

        if let Err(e) = self
            .store
            .set(&self.keys.timestamp, &snapshot.encode_timestamp())
            .await
        {
            self.roll_back_records(previous).await;
            return Err(e.into());
        }

        tracing::debug!(records = snapshot.len(), "snapshot persisted");
        Ok(())
    }

    /// Restore the records value seen before a failed persist.
    ///
    /// If it is unknown or cannot be restored the records key is removed,
    /// leaving the cache empty rather than inconsistent.
    async fn roll_back_records(&self, previous: Result<Option<String>, StoreError>) {
        let restored = match previous {
            Ok(Some(value)) => self.store.set(&self.keys.records, &value).await,
            Ok(None) => self.store.remove(&self.keys.records).await,
            Err(e) => Err(e),
        };
        let Err(e) = restored else {
            tracing::debug!("previous snapshot restored after failed persist");
            return;
        };

        tracing::warn!(error = %e, "could not restore previous snapshot, dropping records");
        if let Err(e) = self.store.remove(&self.keys.records).await {
            tracing::error!(error = %e, "cached records left without matching timestamp");
        }
    }

    /// Read the persisted snapshot.
    ///
    /// Returns `None` if nothing was ever written. A failed or garbled read
    /// is logged and also reported as `None`.
    pub async fn read(&self) -> Option<Snapshot> {
        match self.try_read().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "cached snapshot unreadable, treating as empty");
                None
            }
        }
    }

    async fn try_read(&self) -> Result<Option<Snapshot>, CacheError> {
        let Some(records) = self.store.get(&self.keys.records).await? else {
            return Ok(None);
        };
        let Some(timestamp) = self.store.get(&self.keys.timestamp).await? else {
            tracing::warn!(key = %self.keys.timestamp, "cached records have no timestamp");
            return Ok(None);
        };
        Ok(Some(Snapshot::decode(&records, &timestamp)?))
    }

    /// When the persisted snapshot was written, if readable.
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        match self.store.get(&self.keys.timestamp).await {
            Ok(Some(value)) => parse_timestamp(&value).ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "cache timestamp unreadable");
                None
            }
        }
    }

    /// Remove the persisted snapshot. Clearing an empty cache succeeds.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.store.remove(&self.keys.records).await?;
        self.store.remove(&self.keys.timestamp).await?;
        tracing::debug!("snapshot cache cleared");
        Ok(())
    }

    /// The configured keys.
    pub fn keys(&self) -> &CacheKeys {
        &self.keys
    }

    /// The underlying store.
    pub fn store(&self) -> &K {
        &self.store
    }
}
