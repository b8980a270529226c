use serde::{Deserialize, Serialize};

use crate::data::predicates::{matches_text, visible_by_deletion, DateRange, Predicate, ScoreRange};
use crate::data::summary::RecordSetSummary;

/// One filtering request.
///
/// Built fresh from whatever the caller currently has selected, consumed
/// once by the pipeline, then dropped. Absent criteria match everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search_term: Option<String>,
    pub date_range: Option<DateRange>,
    pub score_range: Option<ScoreRange>,
    pub show_deleted: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_term: None,
            date_range: None,
            score_range: None,
            show_deleted: true,
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria that select every record described by `summary`, the way a
    /// freshly loaded archive is first presented
    pub fn spanning(summary: &RecordSetSummary) -> Self {
        Self {
            search_term: None,
            date_range: summary
                .timestamp_bounds
                .map(|(start, end)| DateRange::new(start, end)),
            score_range: summary
                .score_bounds
                .map(|(min, max)| ScoreRange::new(min, max)),
            show_deleted: true,
        }
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_score_range(mut self, min: i64, max: i64) -> Self {
        self.score_range = Some(ScoreRange::new(min, max));
        self
    }

    pub fn with_show_deleted(mut self, show_deleted: bool) -> Self {
        self.show_deleted = show_deleted;
        self
    }

    /// True when no criterion can exclude a record
    pub fn is_unrestricted(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Predicates for the supplied criteria, in application order:
    /// text, date, score, deletion
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::with_capacity(4);

        if let Some(term) = self.search_term.as_deref().filter(|t| !t.is_empty()) {
            predicates.push(matches_text(term));
        }
        if let Some(range) = self.date_range {
            predicates.push(Predicate::DateRange(range));
        }
        if let Some(range) = self.score_range {
            predicates.push(Predicate::ScoreRange(range));
        }
        if !self.show_deleted {
            predicates.push(visible_by_deletion(false));
        }

        predicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_default_shows_deleted_and_is_unrestricted() {
        let criteria = FilterCriteria::default();
        assert!(criteria.show_deleted);
        assert!(criteria.is_unrestricted());
    }

    #[test]
    fn test_predicate_order_is_fixed() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let criteria = FilterCriteria::new()
            .with_show_deleted(false)
            .with_score_range(1, 5)
            .with_date_range(DateRange::from_dates(day, day))
            .with_search_term("x");

        let kinds: Vec<&str> = criteria
            .predicates()
            .iter()
            .map(|p| match p {
                Predicate::Text(_) => "text",
                Predicate::DateRange(_) => "date",
                Predicate::ScoreRange(_) => "score",
                Predicate::Deletion { .. } => "deletion",
            })
            .collect();
        assert_eq!(kinds, vec!["text", "date", "score", "deletion"]);
    }

    #[test]
    fn test_empty_search_term_adds_no_predicate() {
        assert!(FilterCriteria::new().with_search_term("").is_unrestricted());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"search_term":"rust","score_range":{"min":1,"max":3}}"#)
                .unwrap();
        assert_eq!(criteria.search_term.as_deref(), Some("rust"));
        assert_eq!(criteria.score_range, Some(ScoreRange::new(1, 3)));
        assert!(criteria.show_deleted);
    }
}
