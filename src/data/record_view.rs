use std::sync::Arc;
use tracing::{debug, trace};

use crate::data::criteria::FilterCriteria;
use crate::data::paginator::{self, Page, PageError};
use crate::data::record::{Record, RecordSet};
use crate::data::record_compare::{compare_directed, SortKey};

/// A view over a RecordSet that can filter, sort and page
/// without modifying the underlying records
#[derive(Debug, Clone)]
pub struct RecordView {
    /// The underlying immutable record set
    source: Arc<RecordSet>,

    /// Positions in `source` that are visible, in presentation order
    visible_rows: Vec<usize>,
}

impl RecordView {
    /// Create a new view showing every record in source order
    pub fn new(source: Arc<RecordSet>) -> Self {
        let row_count = source.len();
        Self {
            source,
            visible_rows: (0..row_count).collect(),
        }
    }

    /// Create a view with specific rows
    pub fn with_rows(mut self, rows: Vec<usize>) -> Self {
        self.visible_rows = rows
            .into_iter()
            .filter(|&idx| idx < self.source.len())
            .collect();
        self
    }

    /// Keep rows passing every predicate the criteria supply.
    /// Relative order of surviving rows is unchanged.
    pub fn filter(self, criteria: &FilterCriteria) -> Self {
        let predicates = criteria.predicates();
        if predicates.is_empty() {
            trace!("No active filter criteria, keeping {} rows", self.len());
            return self;
        }

        let before = self.len();
        let view = self.filter_by(|record| predicates.iter().all(|p| p.matches(record)));
        debug!(
            "Filtered {} -> {} rows with {} predicate(s)",
            before,
            view.len(),
            predicates.len()
        );
        view
    }

    /// Keep rows matching an arbitrary predicate
    pub fn filter_by<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Record) -> bool,
    {
        let source = &self.source;
        self.visible_rows.retain(|&row_idx| predicate(&source[row_idx]));
        self
    }

    /// Stable sort of the visible rows by one key
    pub fn sort_by(mut self, key: SortKey, ascending: bool) -> Self {
        let source = &self.source;
        self.visible_rows
            .sort_by(|&a, &b| compare_directed(&source[a], &source[b], key, ascending));

        trace!(
            "Sorted {} rows by {} ({})",
            self.visible_rows.len(),
            key,
            if ascending { "asc" } else { "desc" }
        );
        self
    }

    /// Copy out one page of the visible rows
    pub fn paginate(
        &self,
        page_size: usize,
        page_number: usize,
    ) -> Result<Page<Record>, PageError> {
        let bounds = paginator::page_bounds(self.len(), page_size, page_number)?;
        let entries = self.visible_rows[bounds]
            .iter()
            .map(|&row_idx| self.source[row_idx].clone())
            .collect();

        Ok(Page {
            entries,
            page_number,
            page_size,
            total_pages: paginator::total_pages(self.len(), page_size),
            total_entries: self.len(),
        })
    }

    /// Get the number of visible rows
    pub fn len(&self) -> usize {
        self.visible_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible_rows.is_empty()
    }

    /// Get a visible record by its position in the view
    pub fn get(&self, index: usize) -> Option<&Record> {
        let row_idx = *self.visible_rows.get(index)?;
        self.source.get(row_idx)
    }

    /// Iterate visible records in view order
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.visible_rows
            .iter()
            .filter_map(move |&row_idx| self.source.get(row_idx))
    }

    /// Clone the visible records out, in view order
    pub fn to_records(&self) -> Vec<Record> {
        self.iter().cloned().collect()
    }

    /// Get visible row indices
    pub fn visible_row_indices(&self) -> &[usize] {
        &self.visible_rows
    }
}

impl From<Arc<RecordSet>> for RecordView {
    fn from(source: Arc<RecordSet>) -> Self {
        Self::new(source)
    }
}

impl From<RecordSet> for RecordView {
    fn from(source: RecordSet) -> Self {
        Self::new(Arc::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Arc<RecordSet> {
        let ts = |day| {
            NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        };
        Arc::new(RecordSet::new(vec![
            Record::new(3, "gamma", "first", false, ts(3)),
            Record::new(1, "alpha", "second", true, ts(1)),
            Record::new(3, "beta", "third", false, ts(2)),
            Record::new(2, "delta", "fourth", false, ts(4)),
        ]))
    }

    fn titles(view: &RecordView) -> Vec<&str> {
        view.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_new_view_shows_all_rows() {
        let view = RecordView::new(sample());
        assert_eq!(view.len(), 4);
        assert_eq!(titles(&view), vec!["gamma", "alpha", "beta", "delta"]);
    }

    #[test]
    fn test_filter_does_not_touch_source() {
        let source = sample();
        let view = RecordView::new(source.clone())
            .filter(&FilterCriteria::new().with_show_deleted(false));

        assert_eq!(view.len(), 3);
        assert_eq!(source.len(), 4);
        assert_eq!(titles(&view), vec!["gamma", "beta", "delta"]);
    }

    #[test]
    fn test_sort_ties_keep_source_order_both_directions() {
        let asc = RecordView::new(sample()).sort_by(SortKey::Score, true);
        assert_eq!(titles(&asc), vec!["alpha", "delta", "gamma", "beta"]);

        let desc = RecordView::new(sample()).sort_by(SortKey::Score, false);
        assert_eq!(titles(&desc), vec!["gamma", "beta", "delta", "alpha"]);
    }

    #[test]
    fn test_sort_by_timestamp() {
        let view = RecordView::new(sample()).sort_by(SortKey::Timestamp, true);
        assert_eq!(titles(&view), vec!["alpha", "beta", "gamma", "delta"]);
    }

    #[test]
    fn test_paginate_view() {
        let view = RecordView::new(sample()).sort_by(SortKey::Title, true);
        let page = view.paginate(3, 2).unwrap();
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].title, "gamma");
        assert_eq!(page.total_pages, 2);
        assert!(view.paginate(3, 3).is_err());
    }

    #[test]
    fn test_with_rows_drops_unknown_positions() {
        let view = RecordView::new(sample()).with_rows(vec![3, 9, 0]);
        assert_eq!(titles(&view), vec!["delta", "gamma"]);
        assert_eq!(view.visible_row_indices(), &[3, 0]);
    }
}
