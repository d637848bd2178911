//! Reading progress records

use super::BookId;
use crate::error::{ProgressOutOfRange, ValidationError};
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Percent of a book completed, always within `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Percent(u8);

impl Percent {
    pub const MIN: Percent = Percent(0);
    pub const MAX: Percent = Percent(100);

    pub fn value(self) -> u8 {
        self.0
    }

    /// A book counts as read once progress reaches 100
    pub fn is_complete(self) -> bool {
        self >= Self::MAX
    }
}

impl TryFrom<i64> for Percent {
    type Error = ProgressOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(v) if v <= Self::MAX.0 => Ok(Percent(v)),
            _ => Err(ProgressOutOfRange(value)),
        }
    }
}

impl From<Percent> for i64 {
    fn from(percent: Percent) -> Self {
        i64::from(percent.0)
    }
}

/// One entry of a sync request as it arrives on the wire.
///
/// `progress` is unvalidated; out-of-range values are rejected against their
/// book when the entry is converted into a [`ProgressRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub book_id: BookId,
    #[serde(deserialize_with = "deserialize_progress")]
    pub progress: i64,
    pub last_read_at: DateTime<Utc>,
}

impl ProgressEntry {
    pub fn new(book_id: impl Into<BookId>, progress: i64, last_read_at: DateTime<Utc>) -> Self {
        Self {
            book_id: book_id.into(),
            progress,
            last_read_at,
        }
    }
}

/// Accept any JSON integer. Values beyond `i64` saturate, which keeps them out
/// of range so they are reported against their book like any other bad value.
fn deserialize_progress<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct ProgressVisitor;

    impl<'de> Visitor<'de> for ProgressVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer percentage")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            Ok(i64::try_from(v).unwrap_or(i64::MAX))
        }

        // Integers too long for u64 arrive as floats
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_finite() && v.fract() == 0.0 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }
    }

    deserializer.deserialize_any(ProgressVisitor)
}

/// A validated progress record for one book.
///
/// On the server the owning user is the document the record lives in; on a
/// device it is implicit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub book_id: BookId,
    pub progress: Percent,
    pub last_read_at: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn new(book_id: impl Into<BookId>, progress: Percent, last_read_at: DateTime<Utc>) -> Self {
        Self {
            book_id: book_id.into(),
            progress,
            last_read_at,
        }
    }
}

impl TryFrom<ProgressEntry> for ProgressRecord {
    type Error = ValidationError;

    fn try_from(entry: ProgressEntry) -> Result<Self, Self::Error> {
        match Percent::try_from(entry.progress) {
            Ok(progress) => Ok(ProgressRecord {
                book_id: entry.book_id,
                progress,
                last_read_at: entry.last_read_at,
            }),
            Err(reason) => Err(ValidationError {
                book_id: entry.book_id,
                reason,
            }),
        }
    }
}

impl From<ProgressRecord> for ProgressEntry {
    fn from(record: ProgressRecord) -> Self {
        Self {
            book_id: record.book_id,
            progress: record.progress.into(),
            last_read_at: record.last_read_at,
        }
    }
}

/// What a device knows about one book: its progress and, once downloaded, the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalCacheEntry {
    pub record: ProgressRecord,
    pub content: Option<Vec<String>>,
}
