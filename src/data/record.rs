use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::data::timestamp;

/// Source column holding the entry score
pub const COLUMN_SCORE: &str = "skor";
/// Source column holding the entry title
pub const COLUMN_TITLE: &str = "baslik";
/// Source column holding the entry body
pub const COLUMN_BODY: &str = "entiri";
/// Source column holding the deletion flag
pub const COLUMN_DELETED: &str = "silinmis";
/// Source column holding the entry timestamp
pub const COLUMN_TIMESTAMP: &str = "tarih";

/// Columns every export must carry, in export order
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COLUMN_SCORE,
    COLUMN_TITLE,
    COLUMN_BODY,
    COLUMN_DELETED,
    COLUMN_TIMESTAMP,
];

/// A single normalized entry.
///
/// Serializes with the archive's own column names so converted JSON stays
/// readable by tools that read the exported CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "skor")]
    pub score: i64,

    #[serde(rename = "baslik")]
    pub title: String,

    #[serde(rename = "entiri")]
    pub body: String,

    #[serde(rename = "silinmis")]
    pub deleted: bool,

    #[serde(rename = "tarih", with = "timestamp::serde_format")]
    pub timestamp: NaiveDateTime,
}

impl Record {
    pub fn new(
        score: i64,
        title: impl Into<String>,
        body: impl Into<String>,
        deleted: bool,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            score,
            title: title.into(),
            body: body.into(),
            deleted,
            timestamp,
        }
    }
}

static NEXT_SET_ID: AtomicU64 = AtomicU64::new(1);

/// The immutable collection produced by one normalization run.
///
/// Each set gets a process-unique id when it is built. Records are addressed
/// by position only; duplicates are allowed.
#[derive(Debug, Clone)]
pub struct RecordSet {
    id: u64,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            id: NEXT_SET_ID.fetch_add(1, Ordering::Relaxed),
            records,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Identity of this set, used to key derived results
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }
}

impl Default for RecordSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<usize> for RecordSet {
    type Output = Record;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_sets_get_distinct_ids() {
        let a = RecordSet::empty();
        let b = RecordSet::empty();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let record = Record::new(1, "t", "b", false, at(1));
        let set: RecordSet = vec![record.clone(), record].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set[0], set[1]);
    }

    #[test]
    fn test_json_uses_source_column_names() {
        let record = Record::new(10, "Title", "Body text", false, at(15));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["skor"], 10);
        assert_eq!(json["baslik"], "Title");
        assert_eq!(json["entiri"], "Body text");
        assert_eq!(json["silinmis"], false);
        assert_eq!(json["tarih"], "2024-01-15 12:00:00");
    }
}
