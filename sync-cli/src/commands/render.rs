//! Text rendering of sync states and prompts.

use userlist_sync_core::{Prompt, Severity, SyncPhase, SyncState};

/// Render the list screen for `state`.
pub fn state(state: &SyncState) -> String {
    let mut out = String::new();

    match state.phase() {
        SyncPhase::Idle => out.push_str("Nothing loaded.\n"),
        SyncPhase::Loading | SyncPhase::Refreshing => out.push_str("Loading...\n"),
        SyncPhase::Offline => {
            out.push_str("OFFLINE - showing saved data");
            if let Some(snapshot) = state.snapshot() {
                out.push_str(&format!(
                    " from {}",
                    snapshot.timestamp().format("%Y-%m-%d %H:%M UTC")
                ));
            }
            out.push('\n');
        }
        SyncPhase::Ready | SyncPhase::Error => {}
    }

    if state.phase() == SyncPhase::Ready && state.records().is_empty() {
        out.push_str("No users found\n");
    }
    for user in state.records() {
        out.push_str(&user.summary());
        out.push('\n');
    }

    if let (Some(prompt), Some(message)) = (state.prompt(), state.error_message()) {
        out.push('\n');
        out.push_str(&self::prompt(&prompt, &message));
    }
    out
}

/// Render a prompt with its body text and action choices.
pub fn prompt(prompt: &Prompt, message: &str) -> String {
    let marker = match prompt.severity {
        Severity::Info => "note",
        Severity::Warning => "warning",
        Severity::Blocking => "error",
    };
    let actions: Vec<&str> = prompt.actions.iter().map(|a| a.label()).collect();
    format!(
        "[{}] {}\n  {}\n  Actions: {}\n",
        marker,
        prompt.title,
        message,
        actions.join(" / ")
    )
}
