//! Sync cycle state machine for userlist-sync.
//!
//! One call to `load()` runs one cycle: fetch, then persist and verify on
//! success, or read the local snapshot on failure. [`CycleStep`] is the pure
//! part of that cycle. It takes the result of the last I/O step as an
//! [`Event`] and returns the next step plus the [`Action`] to perform.
//!
//! The I/O itself is performed by sync-client, which only publishes the
//! [`SyncState`] found in [`CycleStep::Finished`].
//!
//! ```text
//!                    FetchSucceeded            PersistSucceeded
//!   Fetching ───────────────────────► Persisting ──────────────► Verifying
//!      │                                  │                          │
//!      │ FetchFailed                      │ PersistFailed            │ Verified
//!      ▼                                  ▼                          ▼
//!  FallingBack ──── CacheRead ────► Finished(Offline | Error | Ready)
//! ```

use userlist_sync_types::{Snapshot, UserRecord};

use crate::report::{ErrorKind, ErrorReporter, Prompt};
use crate::verify::Verification;

/// Why a cycle was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// First load or manual retry.
    Initial,
    /// Pull-to-refresh.
    Refresh,
}

/// Externally visible phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Nothing loaded yet.
    Idle,
    /// Initial load in flight.
    Loading,
    /// Refresh in flight.
    Refreshing,
    /// Fresh data from the remote is displayed.
    Ready,
    /// The local snapshot is displayed because the remote failed.
    Offline,
    /// The cycle ended in a blocking error.
    Error,
}

impl SyncPhase {
    /// True while a cycle is running.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Loading | Self::Refreshing)
    }
}

/// A failure (or offline notice) attached to a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncIssue {
    kind: ErrorKind,
    detail: String,
}

impl SyncIssue {
    fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// The failure kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Technical detail of the underlying cause.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// User-facing message: the prompt text followed by the cause.
    pub fn message(&self) -> String {
        let prompt = ErrorReporter::report(self.kind);
        if self.detail.is_empty() {
            prompt.message.to_string()
        } else {
            format!("{} ({})", prompt.message, self.detail)
        }
    }
}

/// The single source of truth for what the caller renders.
///
/// Fields are private and only set together by the constructors below, so
/// `phase`, `is_offline`, the issue and the records can never drift apart.
/// In particular `is_offline()` holds exactly when `phase()` is
/// [`SyncPhase::Offline`], and then the records came from the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    phase: SyncPhase,
    snapshot: Option<Snapshot>,
    issue: Option<SyncIssue>,
    is_offline: bool,
}

impl SyncState {
    /// Initial state: nothing loaded.
    pub fn idle() -> Self {
        Self {
            phase: SyncPhase::Idle,
            snapshot: None,
            issue: None,
            is_offline: false,
        }
    }

    /// A cycle has started. Prior records, error and offline flag are cleared.
    pub fn in_flight(mode: LoadMode) -> Self {
        let phase = match mode {
            LoadMode::Initial => SyncPhase::Loading,
            LoadMode::Refresh => SyncPhase::Refreshing,
        };
        Self {
            phase,
            ..Self::idle()
        }
    }

    /// Fresh remote data, optionally with a verification warning.
    pub fn ready(snapshot: Snapshot, verification: Verification) -> Self {
        Self {
            phase: SyncPhase::Ready,
            snapshot: Some(snapshot),
            issue: verification
                .describe()
                .map(|detail| SyncIssue::new(ErrorKind::Verification, detail)),
            is_offline: false,
        }
    }

    /// Remote failed; showing the local snapshot.
    pub fn offline(snapshot: Snapshot, cause: &str) -> Self {
        let detail = format!(
            "saved {}; {}",
            userlist_sync_types::format_timestamp(snapshot.timestamp()),
            cause
        );
        Self {
            phase: SyncPhase::Offline,
            snapshot: Some(snapshot),
            issue: Some(SyncIssue::new(ErrorKind::Remote, detail)),
            is_offline: true,
        }
    }

    /// Fetched data could not be persisted. The fetched records stay visible.
    pub fn storage_write_failed(snapshot: Snapshot, cause: &str) -> Self {
        Self {
            phase: SyncPhase::Error,
            snapshot: Some(snapshot),
            issue: Some(SyncIssue::new(ErrorKind::StorageWrite, cause)),
            is_offline: false,
        }
    }

    /// Remote failed and nothing usable was stored locally.
    pub fn no_data(cause: &str) -> Self {
        Self {
            phase: SyncPhase::Error,
            snapshot: None,
            issue: Some(SyncIssue::new(ErrorKind::NoData, cause)),
            is_offline: false,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Records to display (empty if none).
    pub fn records(&self) -> &[UserRecord] {
        self.snapshot.as_ref().map(Snapshot::records).unwrap_or(&[])
    }

    /// The displayed snapshot, if any.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// True when the records came from the local store.
    pub fn is_offline(&self) -> bool {
        self.is_offline
    }

    /// The attached issue, if any.
    pub fn issue(&self) -> Option<&SyncIssue> {
        self.issue.as_ref()
    }

    /// Kind of the attached issue, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.issue.as_ref().map(SyncIssue::kind)
    }

    /// User-facing message of the attached issue, if any.
    pub fn error_message(&self) -> Option<String> {
        self.issue.as_ref().map(SyncIssue::message)
    }

    /// The one prompt to present for this state, if any.
    pub fn prompt(&self) -> Option<Prompt> {
        self.error_kind().map(ErrorReporter::report)
    }

    /// Check the cross-field invariants.
    pub fn is_consistent(&self) -> bool {
        let offline_matches = self.is_offline == (self.phase == SyncPhase::Offline);
        let shape_ok = match self.phase {
            SyncPhase::Idle | SyncPhase::Loading | SyncPhase::Refreshing => {
                self.snapshot.is_none() && self.issue.is_none()
            }
            SyncPhase::Ready => matches!(
                self.error_kind(),
                None | Some(ErrorKind::Verification)
            ),
            SyncPhase::Offline => {
                self.error_kind() == Some(ErrorKind::Remote)
                    && self.snapshot.as_ref().is_some_and(|s| !s.is_empty())
            }
            SyncPhase::Error => match self.error_kind() {
                Some(ErrorKind::StorageWrite) => self.snapshot.is_some(),
                Some(ErrorKind::NoData | ErrorKind::StorageRead) => self.snapshot.is_none(),
                _ => false,
            },
        };
        offline_matches && shape_ok
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Where a running cycle currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleStep {
    /// Waiting for the remote fetch.
    Fetching {
        /// Why the cycle was started.
        mode: LoadMode,
    },
    /// Waiting for the fetched snapshot to be written.
    Persisting {
        /// The fetched snapshot.
        snapshot: Snapshot,
    },
    /// Waiting for the read-back check.
    Verifying {
        /// The fetched snapshot.
        snapshot: Snapshot,
    },
    /// Remote failed; waiting for the local snapshot.
    FallingBack {
        /// Why the remote fetch failed.
        cause: String,
    },
    /// The cycle is over.
    Finished(SyncState),
}

/// Results of the I/O steps, fed back into the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The remote returned a snapshot.
    FetchSucceeded {
        /// The fetched snapshot.
        snapshot: Snapshot,
    },
    /// The remote fetch failed.
    FetchFailed {
        /// Error message describing the failure.
        error: String,
    },
    /// The snapshot was written to the local store.
    PersistSucceeded,
    /// Writing the snapshot failed.
    PersistFailed {
        /// Error message describing the failure.
        error: String,
    },
    /// The read-back check completed.
    Verified {
        /// What the check found.
        outcome: Verification,
    },
    /// The local snapshot was read (`None` if absent or unreadable).
    CacheRead {
        /// The stored snapshot.
        snapshot: Option<Snapshot>,
    },
}

/// I/O to be executed by sync-client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fetch the list from the remote.
    Fetch,
    /// Write the snapshot to the local store.
    Persist {
        /// Snapshot to write.
        snapshot: Snapshot,
    },
    /// Read the snapshot back and compare.
    Verify {
        /// Snapshot that was written.
        snapshot: Snapshot,
    },
    /// Read the last stored snapshot.
    ReadCache,
}

impl CycleStep {
    /// Start a cycle. Returns the first step and the state to publish while
    /// it runs.
    pub fn begin(mode: LoadMode) -> (Self, SyncState, Action) {
        (
            Self::Fetching { mode },
            SyncState::in_flight(mode),
            Action::Fetch,
        )
    }

    /// Process an event and return the next step plus the action to execute.
    ///
    /// This is a pure function. Events that do not apply to the current step
    /// leave it unchanged and produce no action.
    pub fn on_event(self, event: Event) -> (Self, Option<Action>) {
        match (self, event) {
            // From Fetching
            (Self::Fetching { .. }, Event::FetchSucceeded { snapshot }) => (
                Self::Persisting {
                    snapshot: snapshot.clone(),
                },
                Some(Action::Persist { snapshot }),
            ),
            (Self::Fetching { .. }, Event::FetchFailed { error }) => {
                (Self::FallingBack { cause: error }, Some(Action::ReadCache))
            }

            // From Persisting
            (Self::Persisting { snapshot }, Event::PersistSucceeded) => (
                Self::Verifying {
                    snapshot: snapshot.clone(),
                },
                Some(Action::Verify { snapshot }),
            ),
            (Self::Persisting { snapshot }, Event::PersistFailed { error }) => (
                Self::Finished(SyncState::storage_write_failed(snapshot, &error)),
                None,
            ),

            // From Verifying
            (Self::Verifying { snapshot }, Event::Verified { outcome }) => {
                (Self::Finished(SyncState::ready(snapshot, outcome)), None)
            }

            // From FallingBack
            (Self::FallingBack { cause }, Event::CacheRead { snapshot }) => {
                let state = match snapshot {
                    Some(snapshot) if !snapshot.is_empty() => {
                        SyncState::offline(snapshot, &cause)
                    }
                    _ => SyncState::no_data(&cause),
                };
                (Self::Finished(state), None)
            }

            // Invalid transitions - stay in current step
            (step, _) => (step, None),
        }
    }

    /// True once the cycle has produced its final state.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    /// The final state, if the cycle is over.
    pub fn into_state(self) -> Option<SyncState> {
        match self {
            Self::Finished(state) => Some(state),
            _ => None,
        }
    }
}
