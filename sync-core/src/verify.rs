//! Read-back verification of a persisted snapshot.
//!
//! The default check is partial: the persisted copy must exist,
//! have the same length as the fetched one, and share an identical first
//! record. Later records are not inspected unless [`VerificationMode::Full`]
//! is selected.

use serde::{Deserialize, Serialize};
use userlist_sync_types::Snapshot;

/// How much of the persisted copy to compare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMode {
    /// Length plus first record only.
    #[default]
    Partial,
    /// Every record, in order.
    Full,
}

/// Result of comparing a fetched snapshot with its persisted copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The persisted copy passed the check.
    Match,
    /// Nothing readable was persisted.
    Missing,
    /// Record counts differ.
    LengthMismatch {
        /// Records in the fetched snapshot.
        fetched: usize,
        /// Records in the persisted snapshot.
        persisted: usize,
    },
    /// The record at `index` differs.
    RecordMismatch {
        /// Position of the first differing record that was checked.
        index: usize,
    },
}

impl Verification {
    /// True if the persisted copy passed.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    /// Short description of a failed check, `None` on match.
    pub fn describe(&self) -> Option<String> {
        match self {
            Self::Match => None,
            Self::Missing => Some("persisted copy could not be read back".to_string()),
            Self::LengthMismatch { fetched, persisted } => Some(format!(
                "persisted copy holds {} records, fetched {}",
                persisted, fetched
            )),
            Self::RecordMismatch { index } => {
                Some(format!("persisted record at position {} differs", index))
            }
        }
    }
}

/// Compare `fetched` against what was read back from the store.
pub fn verify_snapshot(
    fetched: &Snapshot,
    persisted: Option<&Snapshot>,
    mode: VerificationMode,
) -> Verification {
    let Some(persisted) = persisted else {
        return Verification::Missing;
    };

    if fetched.len() != persisted.len() {
        return Verification::LengthMismatch {
            fetched: fetched.len(),
            persisted: persisted.len(),
        };
    }

    let pairs = fetched.records().iter().zip(persisted.records());
    let checked = match mode {
        VerificationMode::Partial => 1,
        VerificationMode::Full => fetched.len(),
    };

    match pairs.take(checked).position(|(a, b)| a != b) {
        Some(index) => Verification::RecordMismatch { index },
        None => Verification::Match,
    }
}
