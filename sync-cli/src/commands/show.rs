//! Show one user's details from the saved list.

use anyhow::{anyhow, Result};
use userlist_sync_client::{KeyValueStore, LocalCacheStore};

/// Print the contact card of user `id`. Never touches the network.
pub async fn run<K: KeyValueStore>(cache: &LocalCacheStore<K>, id: u64) -> Result<String> {
    let snapshot = cache
        .read()
        .await
        .ok_or_else(|| anyhow!("No saved user list. Run 'userlist load' first."))?;
    let user = snapshot
        .find(id)
        .ok_or_else(|| anyhow!("User #{} is not in the saved list", id))?;

    let card = user.contact_card();
    println!("{}", card);
    Ok(card)
}
