//! Aggregates over a record sequence.
//!
//! These feed the controls a presentation layer seeds from the data (date
//! and score bounds) and the series a visualization layer charts (entries per
//! month, highest-scored entries). Nothing here renders anything.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::data::record::Record;
use crate::data::record_compare::{compare_directed, SortKey};

/// Bounds and counts for a record sequence
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RecordSetSummary {
    pub total: usize,
    pub deleted: usize,
    /// (lowest, highest) score, `None` when empty
    pub score_bounds: Option<(i64, i64)>,
    /// (earliest, latest) timestamp, `None` when empty
    pub timestamp_bounds: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl RecordSetSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .fold(Self::default(), |mut summary, record| {
                summary.total += 1;
                if record.deleted {
                    summary.deleted += 1;
                }

                summary.score_bounds = Some(match summary.score_bounds {
                    Some((lo, hi)) => (lo.min(record.score), hi.max(record.score)),
                    None => (record.score, record.score),
                });
                summary.timestamp_bounds = Some(match summary.timestamp_bounds {
                    Some((lo, hi)) => (lo.min(record.timestamp), hi.max(record.timestamp)),
                    None => (record.timestamp, record.timestamp),
                });

                summary
            })
    }

    pub fn visible(&self) -> usize {
        self.total - self.deleted
    }
}

/// Entry count for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub year: i32,
    pub month: u32,
    pub count: usize,
}

/// Entries per (year, month), oldest first. Months without entries are
/// omitted.
pub fn monthly_frequency<'a, I>(records: I) -> Vec<MonthlyCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buckets: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for record in records {
        let key = (record.timestamp.year(), record.timestamp.month());
        *buckets.entry(key).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|((year, month), count)| MonthlyCount { year, month, count })
        .collect()
}

/// The `n` highest-scored records, highest first. Equal scores keep their
/// input order.
pub fn top_by_score<'a, I>(records: I, n: usize) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut ranked: Vec<&Record> = records.into_iter().collect();
    ranked.sort_by(|a, b| compare_directed(a, b, SortKey::Score, false));
    ranked.truncate(n);
    ranked
}
