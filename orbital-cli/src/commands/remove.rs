//! Remove command implementation

use anyhow::Result;
use orbital_core::{BookId, LocalProgressStore};

pub async fn remove(store: &LocalProgressStore, book: &str) -> Result<()> {
    if store.remove(&BookId::new(book)).await? {
        println!("Removed {}", book);
    } else {
        println!("{} was not in the local cache", book);
    }
    Ok(())
}
