//! Application state

use crate::config::ServerConfig;
use anyhow::Result;
use orbital_core::storage::{LocalStorage, StorageProvider};
use orbital_core::{Catalog, CatalogFile, ReconciliationEngine, StatsAggregator};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Merges device batches into the authoritative store
    pub engine: Arc<ReconciliationEngine>,

    /// Reads statistics from the same store
    pub stats: Arc<StatsAggregator>,
}

impl AppState {
    /// Create application state from configuration
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.storage_path).await?;
        tokio::fs::create_dir_all(config.storage_path.join("progress")).await?;

        let storage = Arc::new(LocalStorage::new(&config.storage_path));
        let catalog = Arc::new(CatalogFile::new(config.catalog_path()));

        tracing::info!(path = ?config.storage_path, "using local storage");
        Ok(Self::with_storage(storage, catalog))
    }

    /// Wire the engine and the aggregator over one storage provider
    pub fn with_storage(storage: Arc<dyn StorageProvider>, catalog: Arc<dyn Catalog>) -> Self {
        let engine = ReconciliationEngine::new(storage);
        let stats = StatsAggregator::new(engine.store().clone(), catalog);

        Self {
            engine: Arc::new(engine),
            stats: Arc::new(stats),
        }
    }
}
