//! Show command implementation

use anyhow::{bail, Result};
use chrono::SecondsFormat;
use orbital_core::{BookId, LocalProgressStore};

/// Display one cached book: progress and offline text
pub async fn show(store: &LocalProgressStore, book: &str) -> Result<()> {
    let Some(entry) = store.entry(&BookId::new(book)).await? else {
        bail!("Book {} is not in the local cache", book);
    };

    let record = &entry.record;
    println!("Book:        {}", record.book_id);
    println!("Progress:    {}%", record.progress.value());
    println!(
        "Last read:   {}",
        record.last_read_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    match &entry.content {
        Some(paragraphs) => {
            println!("Paragraphs:  {}", paragraphs.len());
            if let Some(first) = paragraphs.first() {
                println!();
                println!("{}", first);
            }
        }
        None => println!("Paragraphs:  not cached"),
    }

    Ok(())
}
