//! The core operations as free functions: filter, sort, paginate.
//!
//! Each takes a view and returns a new one, so calls chain in the same order
//! the data flows: records -> filters -> sort -> page.

use crate::data::criteria::FilterCriteria;
use crate::data::paginator::{Page, PageError};
use crate::data::record::Record;
use crate::data::record_compare::SortKey;
use crate::data::record_view::RecordView;

/// Keep records passing every supplied criterion, preserving order
pub fn apply_filters(records: impl Into<RecordView>, criteria: &FilterCriteria) -> RecordView {
    records.into().filter(criteria)
}

/// Stable sort on one key
pub fn sort_records(records: impl Into<RecordView>, key: SortKey, ascending: bool) -> RecordView {
    records.into().sort_by(key, ascending)
}

/// One page of an ordered view. Page numbers start at 1.
pub fn paginate(
    records: &RecordView,
    page_size: usize,
    page_number: usize,
) -> Result<Page<Record>, PageError> {
    records.paginate(page_size, page_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalizer::normalize;
    use std::sync::Arc;

    const INPUT: &str = "skor,baslik,entiri,silinmis,tarih
4,Rust tips,ownership,false,2024-02-01 10:00:00
9,Cooking,rust on a pan,true,2024-02-03 10:00:00
1,Travel,trains,false,2024-02-02 10:00:00
";

    #[test]
    fn test_chain() {
        let records = Arc::new(normalize(INPUT).unwrap().records);

        let filtered = apply_filters(records, &FilterCriteria::new().with_search_term("RUST"));
        let sorted = sort_records(filtered, SortKey::Timestamp, false);
        let page = paginate(&sorted, 10, 1).unwrap();

        let titles: Vec<&str> = page.entries.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Cooking", "Rust tips"]);
        assert_eq!(page.total_pages, 1);
    }
}
