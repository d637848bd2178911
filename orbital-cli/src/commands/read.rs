//! Read command implementation

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use orbital_core::{BookId, LocalProgressStore};

/// Record the device's position in a book
pub async fn read(
    store: &LocalProgressStore,
    book: &str,
    progress: i64,
    at: Option<DateTime<Utc>>,
) -> Result<()> {
    let at = at.unwrap_or_else(Utc::now);

    let record = store
        .upsert(BookId::new(book), progress, at)
        .await
        .with_context(|| format!("Failed to record progress for {}", book))?;

    println!(
        "{}: {}% at {}",
        record.book_id,
        record.progress.value(),
        record.last_read_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    Ok(())
}
