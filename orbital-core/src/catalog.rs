//! Book catalog collaborator
//!
//! The catalog owns book metadata and uploads. The sync engine only needs to
//! know how many books a user has published.

use crate::error::Result;
use crate::types::{BookId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Number of catalog entries uploaded by the user
    async fn count_uploaded_by(&self, user_id: &UserId) -> Result<u64>;
}

/// A book entry in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub uploader_id: Option<UserId>,
    pub uploaded_at: DateTime<Utc>,
}

/// In-memory catalog index
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogIndex {
    pub books: HashMap<BookId, CatalogEntry>,
}

impl CatalogIndex {
    /// Load the index from a JSON file; a missing file is an empty catalog
    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn insert(&mut self, entry: CatalogEntry) {
        self.books.insert(entry.id.clone(), entry);
    }

    fn uploaded_by(&self, user_id: &UserId) -> u64 {
        self.books
            .values()
            .filter(|b| b.uploader_id.as_ref() == Some(user_id))
            .count() as u64
    }
}

#[async_trait]
impl Catalog for CatalogIndex {
    async fn count_uploaded_by(&self, user_id: &UserId) -> Result<u64> {
        Ok(self.uploaded_by(user_id))
    }
}

/// Catalog index file maintained by the catalog service, re-read on every query
pub struct CatalogFile {
    path: PathBuf,
}

impl CatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Catalog for CatalogFile {
    async fn count_uploaded_by(&self, user_id: &UserId) -> Result<u64> {
        Ok(CatalogIndex::load(&self.path).await?.uploaded_by(user_id))
    }
}
