//! Load or refresh the user list.

use anyhow::{Context, Result};
use userlist_sync_client::{KeyValueStore, RemoteDataSource, SyncController};
use userlist_sync_core::{LoadMode, PromptAction, SyncState};

use super::render;

/// Run one cycle and print the result.
///
/// If the resulting prompt offers `on_prompt`, that action is taken once and
/// the outcome printed too. Returns the state left on screen.
pub async fn run<R, K>(
    controller: &SyncController<R, K>,
    mode: LoadMode,
    on_prompt: Option<PromptAction>,
) -> Result<SyncState>
where
    R: RemoteDataSource,
    K: KeyValueStore,
{
    let state = controller
        .load(mode)
        .await
        .context("Failed to load the user list")?;
    print!("{}", render::state(&state));

    answer(controller, state, on_prompt).await
}

/// Take the preselected prompt action, if the prompt offers it.
pub(crate) async fn answer<R, K>(
    controller: &SyncController<R, K>,
    state: SyncState,
    on_prompt: Option<PromptAction>,
) -> Result<SyncState>
where
    R: RemoteDataSource,
    K: KeyValueStore,
{
    let (Some(prompt), Some(action)) = (state.prompt(), on_prompt) else {
        return Ok(state);
    };
    if !prompt.actions.contains(&action) {
        tracing::debug!(?action, kind = ?prompt.kind, "action not offered by prompt");
        return Ok(state);
    }

    println!("> {}", action.label());
    match controller.respond(action).await? {
        Some(next) => {
            print!("{}", render::state(&next));
            Ok(next)
        }
        None => Ok(state),
    }
}
