//! Per-user reading statistics

use crate::catalog::Catalog;
use crate::error::Result;
use crate::reconcile::ProgressStore;
use crate::types::{ProgressRecord, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Percentage points of progress credited as one hour of reading.
///
/// This is a heuristic carried over for compatibility: it turns "percent
/// complete" into a duration without any real time tracking behind it, so
/// `total_reading_hours` is an estimate, not a measurement.
pub const PROGRESS_POINTS_PER_HOUR: f64 = 10.0;

/// Derived statistics, recomputed on every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsSnapshot {
    pub books_read: u64,
    pub books_published: u64,
    pub total_reading_hours: f64,
}

/// Aggregate a user's records into a snapshot
pub fn summarize<'a, I>(records: I, books_published: u64) -> UserStatsSnapshot
where
    I: IntoIterator<Item = &'a ProgressRecord>,
{
    let (books_read, progress_points) = records.into_iter().fold((0u64, 0u64), |(read, points), r| {
        let read = if r.progress.is_complete() { read + 1 } else { read };
        (read, points + u64::from(r.progress.value()))
    });

    UserStatsSnapshot {
        books_read,
        books_published,
        total_reading_hours: progress_points as f64 / PROGRESS_POINTS_PER_HOUR,
    }
}

/// Computes [`UserStatsSnapshot`]s from the authoritative store and the catalog
pub struct StatsAggregator {
    store: ProgressStore,
    catalog: Arc<dyn Catalog>,
}

impl StatsAggregator {
    pub fn new(store: ProgressStore, catalog: Arc<dyn Catalog>) -> Self {
        Self { store, catalog }
    }

    /// Reads without taking the user's sync lock; a snapshot may trail an
    /// in-flight sync by one batch.
    pub async fn compute_stats(&self, user_id: &UserId) -> Result<UserStatsSnapshot> {
        let progress = self.store.load(user_id).await?;
        let published = self.catalog.count_uploaded_by(user_id).await?;
        Ok(summarize(progress.books.values(), published))
    }
}
