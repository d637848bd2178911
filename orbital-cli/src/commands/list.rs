//! List command implementation

use anyhow::Result;
use chrono::SecondsFormat;
use orbital_core::{LocalProgressStore, ProgressEntry};

/// Print every cached progress record
pub async fn list(store: &LocalProgressStore, json: bool) -> Result<()> {
    let records = store.records().await?;

    if json {
        let entries: Vec<ProgressEntry> = records.into_iter().map(ProgressEntry::from).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No books in the local cache");
        return Ok(());
    }

    for record in records {
        println!(
            "{:<32} {:>3}%  {}",
            record.book_id,
            record.progress.value(),
            record.last_read_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }

    Ok(())
}
