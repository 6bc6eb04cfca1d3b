//! In-memory key-value store.
//!
//! Used in tests and as a non-durable fallback. Supports forced failures
//! and silent corruption so every cache path can be exercised.

use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory key-value store. Clones share state.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    entries: HashMap<String, String>,
    fail_next_get: Option<String>,
    fail_next_set: Option<String>,
    fail_set_on: Option<(String, String)>,
    fail_next_remove: Option<String>,
    corrupt_next_set: Option<String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cause the next `get()` to fail with the given error.
    pub fn fail_next_get(&self, error: &str) {
        self.lock().fail_next_get = Some(error.to_string());
    }

    /// Cause the next `set()` to fail with the given error.
    pub fn fail_next_set(&self, error: &str) {
        self.lock().fail_next_set = Some(error.to_string());
    }

    /// Cause the next `set()` of `key` to fail; other keys are unaffected.
    pub fn fail_next_set_on(&self, key: &str, error: &str) {
        self.lock().fail_set_on = Some((key.to_string(), error.to_string()));
    }

    /// Cause the next `remove()` to fail with the given error.
    pub fn fail_next_remove(&self, error: &str) {
        self.lock().fail_next_remove = Some(error.to_string());
    }

    /// Make the next `set()` report success but store `replacement`.
    pub fn corrupt_next_set(&self, replacement: &str) {
        self.lock().corrupt_next_set = Some(replacement.to_string());
    }

    /// Write a value directly, bypassing failure injection.
    pub fn tamper(&self, key: &str, value: &str) {
        self.lock()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    /// Read a value directly, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// True if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut inner = self.lock();

        if let Some(error) = inner.fail_next_get.take() {
            return Err(StoreError::Unavailable(error));
        }

        Ok(inner.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();

        if let Some(error) = inner.fail_next_set.take() {
            return Err(StoreError::Unavailable(error));
        }
        if inner.fail_set_on.as_ref().is_some_and(|(k, _)| k == key) {
            if let Some((_, error)) = inner.fail_set_on.take() {
                return Err(StoreError::Unavailable(error));
            }
        }

        let stored = inner
            .corrupt_next_set
            .take()
            .unwrap_or_else(|| value.to_string());
        inner.entries.insert(key.to_string(), stored);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();

        if let Some(error) = inner.fail_next_remove.take() {
            return Err(StoreError::Unavailable(error));
        }

        inner.entries.remove(key);
        Ok(())
    }
}
