use serde::Serialize;
use std::ops::Range;
use thiserror::Error;

/// Page lookup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page {requested} is out of range (1..={total_pages})")]
    OutOfRange { requested: usize, total_pages: usize },

    #[error("page size must be at least 1")]
    InvalidPageSize,
}

/// A bounded slice of an ordered sequence plus where it sits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_entries: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.page_number == self.total_pages
    }

    /// 1-based position of the first entry within the whole sequence,
    /// or 0 when the page is empty
    pub fn first_entry_number(&self) -> usize {
        if self.entries.is_empty() {
            0
        } else {
            (self.page_number - 1) * self.page_size + 1
        }
    }
}

/// Number of pages needed for `len` entries. Never less than 1, so page 1
/// of an empty sequence exists and is empty.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Index range of a page within a sequence of `len` entries
pub fn page_bounds(
    len: usize,
    page_size: usize,
    page_number: usize,
) -> Result<Range<usize>, PageError> {
    if page_size == 0 {
        return Err(PageError::InvalidPageSize);
    }

    let total_pages = total_pages(len, page_size);
    if page_number == 0 || page_number > total_pages {
        return Err(PageError::OutOfRange {
            requested: page_number,
            total_pages,
        });
    }

    let start = (page_number - 1) * page_size;
    let end = start.saturating_add(page_size).min(len);
    Ok(start.min(len)..end)
}

/// Clamp a requested page number into `[1, total_pages]`. The paginator
/// rejects out-of-range pages, so callers driven by user input clamp first.
pub fn clamp_page_number(len: usize, page_size: usize, requested: usize) -> usize {
    requested.clamp(1, total_pages(len, page_size))
}

/// Slice one page out of an ordered sequence
pub fn paginate<T: Clone>(
    records: &[T],
    page_size: usize,
    page_number: usize,
) -> Result<Page<T>, PageError> {
    let bounds = page_bounds(records.len(), page_size, page_number)?;

    Ok(Page {
        entries: records[bounds].to_vec(),
        page_number,
        page_size,
        total_pages: total_pages(records.len(), page_size),
        total_entries: records.len(),
    })
}
