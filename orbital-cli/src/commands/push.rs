//! Push command implementation

use crate::client::SyncClient;
use anyhow::{Context, Result};
use orbital_core::{build_batch, LocalProgressStore};

/// Send the whole local cache to the server as one snapshot
pub async fn push(store: &LocalProgressStore, client: &SyncClient) -> Result<()> {
    let batch = build_batch(store.records().await?);

    if batch.is_empty() {
        println!("Nothing to push");
        return Ok(());
    }

    tracing::info!(entries = batch.len(), "pushing progress");
    client.push(&batch).await.context("Sync failed")?;

    println!("Pushed {} books", batch.len());
    Ok(())
}
