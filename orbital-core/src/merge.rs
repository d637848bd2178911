//! Last-write-wins merge rule
//!
//! The same rule resolves progress on both sides of a sync: the server folds
//! device batches into the authoritative store with it, and devices fold pulled
//! authoritative records back into their local cache with it.

use crate::types::ProgressRecord;

/// How an incoming record was resolved against what was already stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing was stored for the book; the incoming record is the first write
    Inserted,
    /// The incoming record is strictly newer and replaces the stored one
    Updated,
    /// The stored record is newer or equally new and stays
    ConflictSkipped,
}

impl MergeOutcome {
    pub fn takes_incoming(self) -> bool {
        !matches!(self, MergeOutcome::ConflictSkipped)
    }
}

/// Resolve `incoming` against the stored record for the same book.
///
/// Equal timestamps keep the stored record so two devices reporting the same
/// instant cannot flip the value back and forth.
pub fn resolve(existing: Option<&ProgressRecord>, incoming: &ProgressRecord) -> MergeOutcome {
    match existing {
        None => MergeOutcome::Inserted,
        Some(stored) if incoming.last_read_at > stored.last_read_at => MergeOutcome::Updated,
        Some(_) => MergeOutcome::ConflictSkipped,
    }
}

/// Pick the record that survives a merge
pub fn merge<'a>(existing: Option<&'a ProgressRecord>, incoming: &'a ProgressRecord) -> &'a ProgressRecord {
    match (existing, resolve(existing, incoming)) {
        (Some(stored), MergeOutcome::ConflictSkipped) => stored,
        _ => incoming,
    }
}

/// Pick between two submissions for the same book that arrive together.
///
/// Neither was stored first, so equal timestamps fall back to the higher
/// progress. The result does not depend on argument order.
pub fn newest<'a>(a: &'a ProgressRecord, b: &'a ProgressRecord) -> &'a ProgressRecord {
    let key = |r: &ProgressRecord| (r.last_read_at, r.progress);
    if key(b) > key(a) {
        b
    } else {
        a
    }
}
