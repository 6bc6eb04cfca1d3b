//! # sync-client
//!
//! Offline-first synchronization of the user list.
//!
//! This is the library applications use to show the user list: it fetches
//! from the remote, keeps the last good snapshot in a local store and falls
//! back to it when the remote cannot be reached.
//!
//! ## Features
//!
//! - **Offline Fallback**: the last persisted snapshot is shown when a fetch fails
//! - **Read-back Verification**: persisted snapshots are re-read and compared
//! - **Pluggable Backends**: remote (HTTP, mock) and store (SQLite, memory)
//! - **Pure State Machine**: Uses sync-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use userlist_sync_client::{HttpRemote, HttpRemoteConfig, LoadMode, SqliteStore, SyncConfig, SyncController};
//!
//! let remote = HttpRemote::new(&HttpRemoteConfig::default())?;
//! let store = SqliteStore::new(path).await?;
//! let controller = SyncController::new(SyncConfig::default(), remote, store);
//!
//! let state = controller.load(LoadMode::Initial).await?;
//! for user in state.records() {
//!     println!("{}", user.summary());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod client;
pub mod remote;
pub mod store;
pub mod verify;

pub use cache::{CacheError, CacheKeys, LocalCacheStore};
pub use client::{ControllerError, SyncConfig, SyncController};
pub use remote::{HttpRemote, HttpRemoteConfig, MockRemote, RemoteDataSource, RemoteError};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use verify::VerificationEngine;

pub use userlist_sync_core::{
    ErrorKind, LoadMode, Prompt, PromptAction, Severity, SyncIssue, SyncPhase, SyncState,
    Verification, VerificationMode,
};
pub use userlist_sync_types::{Snapshot, UserRecord};
