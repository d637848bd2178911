//! Orbital Core Library
//!
//! Reading progress synchronization for offline-first readers. Devices keep a
//! local progress cache and send full snapshots of it when they come back
//! online; the server folds those snapshots into one authoritative record per
//! user and book with a last-write-wins rule, and derives reading statistics
//! from the result.

pub mod batch;
pub mod catalog;
pub mod error;
pub mod local;
pub mod merge;
pub mod reconcile;
pub mod stats;
pub mod storage;
pub mod types;

pub use batch::{build_batch, SyncBatch};
pub use catalog::{Catalog, CatalogEntry, CatalogFile, CatalogIndex};
pub use error::{OrbitalError, ProgressOutOfRange, Result, StorageError, ValidationError};
pub use local::LocalProgressStore;
pub use merge::{merge, resolve, MergeOutcome};
pub use reconcile::{ProgressStore, ReconciliationEngine, SyncReport};
pub use stats::{StatsAggregator, UserStatsSnapshot};
pub use types::{BookId, LocalCacheEntry, Percent, ProgressEntry, ProgressRecord, UserId};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_device_to_server_round_trip() {
        let device = LocalProgressStore::new(Arc::new(storage::MemoryStorage::new()));
        device
            .upsert(BookId::new("dune"), 65, Utc::now())
            .await
            .unwrap();

        let engine = ReconciliationEngine::new(Arc::new(storage::MemoryStorage::new()));
        let alice = UserId::new("alice");
        let batch = build_batch(device.records().await.unwrap());
        engine.sync(&alice, &batch).await.unwrap();

        assert_eq!(engine.records(&alice).await.unwrap(), device.records().await.unwrap());
    }
}
