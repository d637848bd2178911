//! Server-side reconciliation of device batches
//!
//! A sync validates the whole batch up front, then takes the user's lock,
//! loads the user's authoritative document, merges every entry into an
//! in-memory copy and commits the copy with one write. A validation or
//! storage failure therefore never leaves a partially applied batch behind,
//! and two devices racing for the same user cannot interleave their
//! lookup-then-write steps.

mod locks;
mod store;

pub use locks::{UserGuard, UserLocks};
pub use store::{ProgressStore, UserProgress};

use crate::batch::SyncBatch;
use crate::error::Result;
use crate::merge::{merge, newest, resolve, MergeOutcome};
use crate::storage::StorageProvider;
use crate::types::{BookId, ProgressRecord, UserId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// What a sync did with each submitted entry.
///
/// Skipped entries are not failures; they are reported so callers and tests can
/// tell a no-op sync from one that changed state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl SyncReport {
    pub fn changed(&self) -> bool {
        self.inserted + self.updated > 0
    }

    fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Inserted => self.inserted += 1,
            MergeOutcome::Updated => self.updated += 1,
            MergeOutcome::ConflictSkipped => self.skipped += 1,
        }
    }
}

/// Validate every entry and collapse repeated books to their newest entry.
///
/// Fails on the first out-of-range entry without touching any state.
pub fn validate_batch(batch: &SyncBatch) -> Result<(BTreeMap<BookId, ProgressRecord>, usize)> {
    let mut records: BTreeMap<BookId, ProgressRecord> = BTreeMap::new();
    let mut collapsed = 0;

    for entry in &batch.progresses {
        let record = ProgressRecord::try_from(entry.clone())?;
        let keep = match records.get(&record.book_id) {
            Some(current) => {
                collapsed += 1;
                newest(current, &record).clone()
            }
            None => record,
        };
        records.insert(keep.book_id.clone(), keep);
    }

    Ok((records, collapsed))
}

/// Merge one validated record into a user's books
pub fn apply(books: &mut BTreeMap<BookId, ProgressRecord>, incoming: ProgressRecord) -> MergeOutcome {
    let existing = books.get(&incoming.book_id);
    let outcome = resolve(existing, &incoming);
    if outcome.takes_incoming() {
        let winner = merge(existing, &incoming).clone();
        books.insert(winner.book_id.clone(), winner);
    }
    outcome
}

/// Folds device batches into the authoritative store with last-write-wins
pub struct ReconciliationEngine {
    store: ProgressStore,
    locks: UserLocks,
}

impl ReconciliationEngine {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self::with_store(ProgressStore::new(storage))
    }

    pub fn with_store(store: ProgressStore) -> Self {
        Self {
            store,
            locks: UserLocks::new(),
        }
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Apply a device batch for `user_id`.
    ///
    /// Any `Ok` is success for the caller, whatever the report says.
    pub async fn sync(&self, user_id: &UserId, batch: &SyncBatch) -> Result<SyncReport> {
        let (incoming, collapsed) = validate_batch(batch).inspect_err(|e| {
            tracing::warn!(user = %user_id, error = %e, "sync batch rejected");
        })?;

        let mut report = SyncReport {
            skipped: collapsed,
            ..SyncReport::default()
        };
        if incoming.is_empty() {
            return Ok(report);
        }

        let _guard = self.locks.acquire(user_id).await;
        let mut progress = self.store.load(user_id).await?;

        for record in incoming.into_values() {
            report.record(apply(&mut progress.books, record));
        }

        if report.changed() {
            self.store.commit(&progress).await.inspect_err(|e| {
                tracing::error!(user = %user_id, error = %e, "failed to commit sync");
            })?;
        }

        tracing::info!(
            user = %user_id,
            inserted = report.inserted,
            updated = report.updated,
            skipped = report.skipped,
            "sync applied"
        );
        Ok(report)
    }

    /// The user's authoritative records, ordered by book id
    pub async fn records(&self, user_id: &UserId) -> Result<Vec<ProgressRecord>> {
        Ok(self.store.load(user_id).await?.books.into_values().collect())
    }
}
