//! Stats command implementation

use crate::client::SyncClient;
use anyhow::Result;

pub async fn stats(client: &SyncClient) -> Result<()> {
    let stats = client.stats().await?;

    println!("Books read:      {}", stats.books_read);
    println!("Books published: {}", stats.books_published);
    println!("Reading hours:   {:.1}", stats.total_reading_hours);

    Ok(())
}
