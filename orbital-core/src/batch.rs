//! Sync request assembly
//!
//! A batch is a full snapshot of what the device knows, not a log of changes
//! since the last sync. Sending the same snapshot twice is harmless because
//! the server discards anything that is not strictly newer.

use crate::merge::newest;
use crate::types::{BookId, ProgressEntry, ProgressRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of a sync request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncBatch {
    pub progresses: Vec<ProgressEntry>,
}

impl SyncBatch {
    pub fn new(progresses: Vec<ProgressEntry>) -> Self {
        Self { progresses }
    }

    pub fn len(&self) -> usize {
        self.progresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.progresses.is_empty()
    }
}

/// Build a sync request from the device's records.
///
/// One entry per book, ordered by book id. Duplicate books collapse to the
/// newest record.
pub fn build_batch<I>(records: I) -> SyncBatch
where
    I: IntoIterator<Item = ProgressRecord>,
{
    let mut latest: BTreeMap<BookId, ProgressRecord> = BTreeMap::new();
    for record in records {
        let keep = match latest.get(&record.book_id) {
            Some(current) => newest(current, &record).clone(),
            None => record,
        };
        latest.insert(keep.book_id.clone(), keep);
    }

    SyncBatch::new(latest.into_values().map(ProgressEntry::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Percent;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn record(book: &str, progress: i64, secs: i64) -> ProgressRecord {
        ProgressRecord::new(book, Percent::try_from(progress).unwrap(), at(secs))
    }

    #[test]
    fn test_empty_batch() {
        let batch = build_batch(Vec::<ProgressRecord>::new());
        assert!(batch.is_empty());
    }

    #[test]
    fn test_one_entry_per_book_in_book_order() {
        let batch = build_batch(vec![
            record("solaris", 10, 100),
            record("dune", 40, 200),
        ]);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.progresses[0], ProgressEntry::new("dune", 40, at(200)));
        assert_eq!(batch.progresses[1], ProgressEntry::new("solaris", 10, at(100)));
    }

    #[test]
    fn test_duplicates_collapse_to_newest() {
        let batch = build_batch(vec![
            record("dune", 80, 300),
            record("dune", 40, 200),
        ]);

        assert_eq!(batch.progresses, vec![ProgressEntry::new("dune", 80, at(300))]);
    }

    #[test]
    fn test_batch_wire_shape() {
        let batch = build_batch(vec![record("dune", 40, 0)]);
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["progresses"][0]["bookId"], "dune");
        assert_eq!(json["progresses"][0]["progress"], 40);
    }
}
