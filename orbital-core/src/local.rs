//! Device-side progress cache
//!
//! The device is the only writer of its own cache, so [`LocalProgressStore::upsert`]
//! overwrites without merging. Records pulled from the server go through
//! [`LocalProgressStore::absorb`] instead, which applies the shared merge rule.

use crate::error::{Result, StorageError, ValidationError};
use crate::merge::{merge, resolve};
use crate::storage::{read_json, write_json, LocalStorage, StorageProvider};
use crate::types::{BookId, LocalCacheEntry, Percent, ProgressRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const INDEX_PATH: &str = "progress.json";

/// Progress-by-book document
#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalIndex {
    books: BTreeMap<BookId, ProgressRecord>,
}

/// Content-blob-by-book document
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentBlob {
    book_id: BookId,
    paragraphs: Vec<String>,
}

fn content_path(book_id: &BookId) -> String {
    format!("content/{}.json", book_id.storage_key())
}

/// Durable per-device cache of reading progress and downloaded book text
pub struct LocalProgressStore {
    storage: Arc<dyn StorageProvider>,
    write_lock: Mutex<()>,
}

impl LocalProgressStore {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Open a cache rooted at a directory on disk
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(LocalStorage::new(root)))
    }

    async fn load_index(&self) -> Result<LocalIndex> {
        Ok(read_json(self.storage.as_ref(), INDEX_PATH)
            .await?
            .unwrap_or_default())
    }

    async fn save_index(&self, index: &LocalIndex) -> Result<()> {
        write_json(self.storage.as_ref(), INDEX_PATH, index).await
    }

    pub async fn get(&self, book_id: &BookId) -> Result<Option<ProgressRecord>> {
        Ok(self.load_index().await?.books.remove(book_id))
    }

    /// Record the device's current position in a book, replacing whatever was cached
    pub async fn upsert(
        &self,
        book_id: BookId,
        progress: i64,
        last_read_at: DateTime<Utc>,
    ) -> Result<ProgressRecord> {
        let progress = Percent::try_from(progress).map_err(|reason| ValidationError {
            book_id: book_id.clone(),
            reason,
        })?;
        let record = ProgressRecord::new(book_id, progress, last_read_at);

        let _guard = self.write_lock.lock().await;
        let mut index = self.load_index().await?;
        index.books.insert(record.book_id.clone(), record.clone());
        self.save_index(&index).await?;

        tracing::debug!(book = %record.book_id, progress = %progress.value(), "progress cached");
        Ok(record)
    }

    /// Every cached record, ordered by book id
    pub async fn records(&self) -> Result<Vec<ProgressRecord>> {
        Ok(self.load_index().await?.books.into_values().collect())
    }

    pub async fn get_content(&self, book_id: &BookId) -> Result<Option<Vec<String>>> {
        let blob: Option<ContentBlob> =
            read_json(self.storage.as_ref(), &content_path(book_id)).await?;
        Ok(blob.map(|b| b.paragraphs))
    }

    pub async fn save_content(&self, book_id: &BookId, paragraphs: Vec<String>) -> Result<()> {
        let blob = ContentBlob {
            book_id: book_id.clone(),
            paragraphs,
        };
        let _guard = self.write_lock.lock().await;
        write_json(self.storage.as_ref(), &content_path(book_id), &blob).await
    }

    /// Cached progress together with the cached text, if the book is known locally
    pub async fn entry(&self, book_id: &BookId) -> Result<Option<LocalCacheEntry>> {
        let Some(record) = self.get(book_id).await? else {
            return Ok(None);
        };
        let content = self.get_content(book_id).await?;
        Ok(Some(LocalCacheEntry { record, content }))
    }

    /// Forget a book: its progress and its cached text.
    ///
    /// Returns whether anything was removed. The text goes first, so a failed
    /// delete leaves the book cached as it was.
    pub async fn remove(&self, book_id: &BookId) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let had_content = match self.storage.delete(&content_path(book_id)).await {
            Ok(()) => true,
            Err(StorageError::NotFound(_)) => false,
            Err(e) => return Err(e.into()),
        };

        let mut index = self.load_index().await?;
        let had_progress = index.books.remove(book_id).is_some();
        if had_progress {
            self.save_index(&index).await?;
        }

        Ok(had_progress || had_content)
    }

    /// Fold records fetched from the server into the cache.
    ///
    /// Each record goes through the same last-write-wins rule the server uses,
    /// so newer local reads that have not been pushed yet are kept. Returns the
    /// number of cached records that changed.
    pub async fn absorb(&self, records: Vec<ProgressRecord>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut index = self.load_index().await?;

        let mut changed = 0;
        for incoming in records {
            let existing = index.books.get(&incoming.book_id);
            if !resolve(existing, &incoming).takes_incoming() {
                continue;
            }
            let winner = merge(existing, &incoming).clone();
            index.books.insert(winner.book_id.clone(), winner);
            changed += 1;
        }

        if changed > 0 {
            self.save_index(&index).await?;
        }
        Ok(changed)
    }
}
