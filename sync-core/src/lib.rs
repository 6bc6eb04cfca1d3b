//! # sync-core
//!
//! Pure logic for userlist-sync (no I/O, instant tests).
//!
//! This crate implements the sync cycle state machine, read-back
//! verification and the error-to-prompt mapping without any network or
//! disk I/O.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (network, local store) is performed by `sync-client`, which
//! interprets the actions produced by these state machines.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod report;
pub mod state;
pub mod verify;

pub use report::{Dispatch, ErrorKind, ErrorReporter, Prompt, PromptAction, Severity};
pub use state::{Action, CycleStep, Event, LoadMode, SyncIssue, SyncPhase, SyncState};
pub use verify::{verify_snapshot, Verification, VerificationMode};
