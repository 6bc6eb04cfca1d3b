//! Mapping from failure kinds to user-facing prompts.
//!
//! The mapping is fixed per kind. Prompt content lives here; what happens
//! when an action is picked is decided by [`PromptAction::dispatch`] and
//! executed by the caller.

/// Kinds of failure a sync cycle can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The remote fetch failed; recovered from the local snapshot.
    Remote,
    /// The remote fetch failed and no local snapshot exists.
    NoData,
    /// A freshly fetched snapshot could not be written locally.
    StorageWrite,
    /// The persisted snapshot failed read-back verification.
    Verification,
    /// The local snapshot could not be read.
    ///
    /// The sync cycle reports unreadable snapshots as [`ErrorKind::NoData`];
    /// this kind is for callers that read the store themselves.
    StorageRead,
}

/// How strongly a prompt interrupts the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational notice; data is shown.
    Info,
    /// Non-blocking warning; data is shown.
    Warning,
    /// The caller must acknowledge before continuing.
    Blocking,
}

/// Actions a prompt can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    /// Run the sync cycle again.
    Retry,
    /// Keep going with what is displayed.
    Continue,
    /// Dismiss the prompt.
    Cancel,
    /// Confirm the message was read.
    Acknowledge,
}

/// What the caller should do after an action is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Invoke `retry()`.
    Retry,
    /// Close the prompt; nothing else.
    Dismiss,
}

impl PromptAction {
    /// Map the picked action to what the caller does next.
    pub fn dispatch(self) -> Dispatch {
        match self {
            Self::Retry => Dispatch::Retry,
            Self::Continue | Self::Cancel | Self::Acknowledge => Dispatch::Dismiss,
        }
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Retry => "Retry",
            Self::Continue => "Continue",
            Self::Cancel => "Cancel",
            Self::Acknowledge => "OK",
        }
    }
}

/// A prompt ready to be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// The failure kind this prompt describes.
    pub kind: ErrorKind,
    /// How the prompt is presented.
    pub severity: Severity,
    /// Short title.
    pub title: &'static str,
    /// Body text.
    pub message: &'static str,
    /// Offered actions, in display order.
    pub actions: &'static [PromptAction],
}

/// Stateless mapping from [`ErrorKind`] to [`Prompt`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorReporter;

impl ErrorReporter {
    /// Build the prompt for `kind`.
    pub fn report(kind: ErrorKind) -> Prompt {
        use PromptAction::*;

        let (severity, title, message, actions): (_, _, _, &'static [PromptAction]) = match kind {
            ErrorKind::Remote => (
                Severity::Info,
                "Offline mode",
                "The server could not be reached. Showing the last saved list.",
                &[Continue, Retry],
            ),
            ErrorKind::NoData => (
                Severity::Blocking,
                "No data available",
                "The server could not be reached and no saved list exists on this device.",
                &[Retry, Cancel],
            ),
            ErrorKind::StorageWrite => (
                Severity::Blocking,
                "Could not save data",
                "The list could not be saved on this device. You must be online to see data.",
                &[Acknowledge],
            ),
            ErrorKind::Verification => (
                Severity::Warning,
                "Saved data not verified",
                "The saved copy of the list did not match what was downloaded.",
                &[Retry, Continue],
            ),
            ErrorKind::StorageRead => (
                Severity::Blocking,
                "No data available",
                "The saved list on this device could not be read.",
                &[Retry, Cancel],
            ),
        };

        Prompt {
            kind,
            severity,
            title,
            message,
            actions,
        }
    }
}
