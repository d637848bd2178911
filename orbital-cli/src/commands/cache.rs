//! Cache command implementation

use anyhow::{Context, Result};
use orbital_core::{BookId, LocalProgressStore};
use std::path::Path;

/// Split plain text into paragraphs on blank lines.
///
/// Lines inside a paragraph are joined with a single space.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

/// Store a book's text for offline reading
pub async fn cache(store: &LocalProgressStore, book: &str, file: &Path) -> Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let paragraphs = split_paragraphs(&text);
    let count = paragraphs.len();

    store
        .save_content(&BookId::new(book), paragraphs)
        .await
        .with_context(|| format!("Failed to cache text for {}", book))?;

    println!("Cached {} paragraphs for {}", count, book);
    Ok(())
}
