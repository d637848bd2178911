//! Authoritative progress documents, one per user

use crate::error::Result;
use crate::storage::{read_json, write_json, StorageProvider};
use crate::types::{BookId, ProgressRecord, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Every authoritative record a user has, keyed by book.
///
/// The map key makes "at most one record per (user, book)" structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: UserId,
    pub books: BTreeMap<BookId, ProgressRecord>,
}

impl UserProgress {
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            books: BTreeMap::new(),
        }
    }
}

/// Server-side source of truth for merged progress
#[derive(Clone)]
pub struct ProgressStore {
    storage: Arc<dyn StorageProvider>,
}

impl ProgressStore {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    fn document_path(user_id: &UserId) -> String {
        format!("progress/{}.json", user_id.storage_key())
    }

    /// Load a user's records; a user who never synced has none
    pub async fn load(&self, user_id: &UserId) -> Result<UserProgress> {
        let doc = read_json(self.storage.as_ref(), &Self::document_path(user_id)).await?;
        Ok(doc.unwrap_or_else(|| UserProgress::empty(user_id.clone())))
    }

    /// Replace a user's records in a single document write.
    ///
    /// If the write fails the previous document is still in place.
    pub async fn commit(&self, progress: &UserProgress) -> Result<()> {
        write_json(
            self.storage.as_ref(),
            &Self::document_path(&progress.user_id),
            progress,
        )
        .await
    }
}
