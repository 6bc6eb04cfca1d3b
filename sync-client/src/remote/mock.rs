//! Mock remote for testing.
//!
//! Serves a configurable user list, or fails like an unreachable server.

use super::{RemoteDataSource, RemoteError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use userlist_sync_types::{Snapshot, UserRecord};

/// Mock remote for testing.
///
/// Clones share state, so a test can keep a handle after moving one into
/// the controller.
#[derive(Debug, Default)]
pub struct MockRemote {
    inner: Arc<Mutex<MockRemoteInner>>,
}

#[derive(Debug, Default)]
struct MockRemoteInner {
    /// `None` means the remote is unreachable.
    users: Option<Vec<UserRecord>>,
    fail_next_fetch: Option<String>,
    fetch_count: usize,
}

impl MockRemote {
    /// Create an unreachable remote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a remote serving `users`.
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        let remote = Self::new();
        remote.set_users(users);
        remote
    }

    /// Serve `users` from now on.
    pub fn set_users(&self, users: Vec<UserRecord>) {
        self.lock().users = Some(users);
    }

    /// Make every following fetch fail.
    pub fn go_offline(&self) {
        self.lock().users = None;
    }

    /// Cause only the next fetch to fail with the given error.
    pub fn fail_next_fetch(&self, error: &str) {
        self.lock().fail_next_fetch = Some(error.to_string());
    }

    /// Number of fetch calls so far.
    pub fn fetch_count(&self) -> usize {
        self.lock().fetch_count
    }

    fn lock(&self) -> MutexGuard<'_, MockRemoteInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for MockRemote {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl RemoteDataSource for MockRemote {
    async fn fetch(&self) -> Result<Snapshot, RemoteError> {
        let mut inner = self.lock();
        inner.fetch_count += 1;

        // Check for forced failure
        if let Some(error) = inner.fail_next_fetch.take() {
            return Err(RemoteError::Transport(error));
        }

        match &inner.users {
            Some(users) => Ok(Snapshot::capture(users.clone())),
            None => Err(RemoteError::Transport("network unreachable".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userlist_sync_types::{Address, Company};

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

    #[tokio::test]
    async fn new_remote_is_unreachable() {
        let remote = MockRemote::new();
        let result = remote.fetch().await;
        assert!(matches!(result, Err(RemoteError::Transport(_))));
        assert_eq!(remote.fetch_count(), 1);
    }

    #[tokio::test]
    async fn serves_users_in_order() {
        let remote = MockRemote::with_users(vec![user(2, "Bo"), user(1, "Ana")]);
        let snapshot = remote.fetch().await.unwrap();
        let ids: Vec<u64> = snapshot.records().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn forced_failure_is_one_shot() {
        let remote = MockRemote::with_users(vec![user(1, "Ana")]);
        remote.fail_next_fetch("timeout");

        let result = remote.fetch().await;
        assert!(matches!(result, Err(RemoteError::Transport(e)) if e == "timeout"));

        // Next fetch should work
        assert_eq!(remote.fetch().await.unwrap().len(), 1);
        assert_eq!(remote.fetch_count(), 2);
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let remote1 = MockRemote::with_users(vec![user(1, "Ana")]);
        let remote2 = remote1.clone();

        remote2.go_offline();
        assert!(remote1.fetch().await.is_err());
        assert_eq!(remote2.fetch_count(), 1);
    }
}
