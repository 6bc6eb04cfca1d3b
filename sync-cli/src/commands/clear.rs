//! Clear the local cache and reload.

use anyhow::{Context, Result};
use userlist_sync_client::{KeyValueStore, RemoteDataSource, SyncController};
use userlist_sync_core::{PromptAction, SyncState};

use super::{load, render};

/// Run the clear-cache command.
pub async fn run<R, K>(
    controller: &SyncController<R, K>,
    on_prompt: Option<PromptAction>,
) -> Result<SyncState>
where
    R: RemoteDataSource,
    K: KeyValueStore,
{
    let state = controller
        .clear_cache()
        .await
        .context("Failed to clear the local cache")?;
    println!("Local cache cleared.");
    print!("{}", render::state(&state));

    load::answer(controller, state, on_prompt).await
}
