//! Remote data source abstraction for userlist-sync.
//!
//! The remote exposes a single operation, `fetch()`, returning the full
//! current user list as a [`Snapshot`]. Implementations never retry; retries
//! are a user action at the controller level.
//!
//! # Example
//!
//! ```ignore
//! let remote = HttpRemote::new(&HttpRemoteConfig::default())?;
//! let snapshot = remote.fetch().await?;
//! ```

mod http;
mod mock;

pub use http::{HttpRemote, HttpRemoteConfig};
pub use mock::MockRemote;

use async_trait::async_trait;
use thiserror::Error;
use userlist_sync_types::Snapshot;

/// Remote fetch errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection or transport failure.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned HTTP {code}")]
    Status {
        /// HTTP status code.
        code: u16,
    },

    /// The response body was not a user list.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Source of the authoritative user list.
#[async_trait]
pub trait RemoteDataSource: Send + Sync {
    /// Fetch the complete current list, in server order.
    async fn fetch(&self) -> Result<Snapshot, RemoteError>;
}
