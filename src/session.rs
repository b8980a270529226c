//! Session context
//!
//! Owns the record set for the current upload and hands out derived views.
//! The presentation layer keeps one `Session` and passes it into each
//! interaction; nothing in the core is global.
//!
//! Filter+sort results are memoized per `(record set id, criteria, sort)`.
//! Loading a new export swaps the set (and its id), so stale entries can
//! never be served; the cache is cleared anyway to release memory.

use anyhow::Result;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::data::criteria::FilterCriteria;
use crate::data::normalizer::{self, NormalizedSet, RowRejection, SchemaError};
use crate::data::paginator::{Page, PageError};
use crate::data::record::{Record, RecordSet};
use crate::data::record_compare::SortKey;
use crate::data::record_view::RecordView;
use crate::data::summary::RecordSetSummary;

/// Everything one interaction asks of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub criteria: FilterCriteria,
    pub sort_key: SortKey,
    pub ascending: bool,
    pub page_size: usize,
    pub page_number: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            sort_key: SortKey::Timestamp,
            ascending: false,
            page_size: 10,
            page_number: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ViewKey {
    set_id: u64,
    criteria: FilterCriteria,
    sort_key: SortKey,
    ascending: bool,
}

pub struct Session {
    records: Arc<RecordSet>,
    rejected: Vec<RowRejection>,
    cache: Option<LruCache<ViewKey, RecordView>>,
}

impl Session {
    /// Empty session. `cache_capacity` of 0 turns memoization off.
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            records: Arc::new(RecordSet::empty()),
            rejected: Vec::new(),
            cache: NonZeroUsize::new(cache_capacity).map(LruCache::new),
        }
    }

    pub fn from_normalized(normalized: NormalizedSet, cache_capacity: usize) -> Self {
        let mut session = Self::new(cache_capacity);
        session.replace(normalized);
        session
    }

    /// Replace the current record set with a fresh normalization result
    pub fn replace(&mut self, normalized: NormalizedSet) {
        let NormalizedSet { records, rejected } = normalized;
        info!(
            "Session now holds {} records ({} rejected)",
            records.len(),
            rejected.len()
        );

        self.records = Arc::new(records);
        self.rejected = rejected;
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }

    /// Normalize delimited text and make it the current set. On a schema
    /// error the previous set stays in place.
    pub fn load_str(&mut self, raw_text: &str) -> Result<usize, SchemaError> {
        let normalized = normalizer::normalize(raw_text)?;
        let count = normalized.records.len();
        self.replace(normalized);
        Ok(count)
    }

    /// Normalize an export file and make it the current set
    pub fn load_path<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let normalized = normalizer::normalize_path(path)?;
        let count = normalized.records.len();
        self.replace(normalized);
        Ok(count)
    }

    pub fn records(&self) -> &Arc<RecordSet> {
        &self.records
    }

    /// Rows dropped by the most recent load
    pub fn rejected(&self) -> &[RowRejection] {
        &self.rejected
    }

    pub fn summary(&self) -> RecordSetSummary {
        RecordSetSummary::from_records(self.records.as_ref())
    }

    /// Filtered and sorted view of the current set
    pub fn view(
        &mut self,
        criteria: &FilterCriteria,
        sort_key: SortKey,
        ascending: bool,
    ) -> RecordView {
        let key = ViewKey {
            set_id: self.records.id(),
            criteria: criteria.clone(),
            sort_key,
            ascending,
        };

        if let Some(view) = self.cache.as_mut().and_then(|cache| cache.get(&key)) {
            debug!("View cache hit for set {}", key.set_id);
            return view.clone();
        }

        let view = RecordView::new(Arc::clone(&self.records))
            .filter(criteria)
            .sort_by(sort_key, ascending);

        if let Some(cache) = self.cache.as_mut() {
            cache.put(key, view.clone());
        }
        view
    }

    /// Run a full filter -> sort -> paginate pass
    pub fn query(&mut self, query: &Query) -> Result<Page<Record>, PageError> {
        self.view(&query.criteria, query.sort_key, query.ascending)
            .paginate(query.page_size, query.page_number)
    }

    /// Number of memoized views
    pub fn cached_views(&self) -> usize {
        self.cache.as_ref().map_or(0, LruCache::len)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(32)
    }
}
