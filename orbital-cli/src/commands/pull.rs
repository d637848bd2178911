//! Pull command implementation

use crate::client::SyncClient;
use anyhow::{Context, Result};
use orbital_core::{LocalProgressStore, ProgressRecord};

/// Merge the server's authoritative progress into the local cache.
///
/// Local reads newer than the server's copy are kept.
pub async fn pull(store: &LocalProgressStore, client: &SyncClient) -> Result<()> {
    let entries = client.pull().await.context("Pull failed")?;
    let fetched = entries.len();

    let records = entries
        .into_iter()
        .map(ProgressRecord::try_from)
        .collect::<Result<Vec<_>, _>>()
        .context("Server returned invalid progress")?;

    let changed = store.absorb(records).await?;
    tracing::info!(fetched, changed, "pulled progress");

    println!("Pulled {} books, {} updated locally", fetched, changed);
    Ok(())
}
