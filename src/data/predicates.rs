//! Record predicates
//!
//! Each predicate is a pure test over a single [`Record`]. They are built
//! with the constructor functions below and combined by the filter pipeline:
//! - [`matches_text`] case-insensitive substring search over title and body
//! - [`in_date_range`] inclusive timestamp window
//! - [`in_score_range`] inclusive score window
//! - [`visible_by_deletion`] hides deleted entries on request

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::data::record::Record;
use crate::data::timestamp::{self, end_of_day, start_of_day};

/// Inclusive timestamp window. Both bounds are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "timestamp::serde_format")]
    pub start: NaiveDateTime,
    #[serde(with = "timestamp::serde_format")]
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whole calendar days, from the first instant of `start` to the last
    /// instant of `end`
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(start_of_day(start), end_of_day(end))
    }

    /// Parse user-supplied bounds. A bare date on the end bound covers that
    /// whole day.
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        let start = timestamp::parse_timestamp(start)?;
        let end = match timestamp::parse_date(end) {
            Some(date) => end_of_day(date),
            None => timestamp::parse_timestamp(end)?,
        };
        Some(Self::new(start, end))
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        self.start <= *timestamp && *timestamp <= self.end
    }
}

/// Inclusive score window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: i64,
    pub max: i64,
}

impl ScoreRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, score: i64) -> bool {
        self.min <= score && score <= self.max
    }
}

/// A single filter test over a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-folded needle; empty matches everything
    Text(String),
    DateRange(DateRange),
    ScoreRange(ScoreRange),
    Deletion { show_deleted: bool },
}

impl Predicate {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::Text(needle) => {
                needle.is_empty()
                    || record.title.to_lowercase().contains(needle.as_str())
                    || record.body.to_lowercase().contains(needle.as_str())
            }
            Predicate::DateRange(range) => range.contains(&record.timestamp),
            Predicate::ScoreRange(range) => range.contains(record.score),
            Predicate::Deletion { show_deleted } => *show_deleted || !record.deleted,
        }
    }
}

pub fn matches_text(term: &str) -> Predicate {
    Predicate::Text(term.to_lowercase())
}

pub fn in_date_range(start: NaiveDateTime, end: NaiveDateTime) -> Predicate {
    Predicate::DateRange(DateRange::new(start, end))
}

pub fn in_score_range(min: i64, max: i64) -> Predicate {
    Predicate::ScoreRange(ScoreRange::new(min, max))
}

pub fn visible_by_deletion(show_deleted: bool) -> Predicate {
    Predicate::Deletion { show_deleted }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn record(score: i64, title: &str, body: &str, deleted: bool) -> Record {
        Record::new(score, title, body, deleted, ts(15, 10))
    }

    #[test]
    fn test_text_is_case_insensitive_over_title_and_body() {
        let r = record(1, "Rust Notes", "borrow CHECKER", false);
        assert!(matches_text("rust").matches(&r));
        assert!(matches_text("checker").matches(&r));
        assert!(matches_text("NOTES").matches(&r));
        assert!(!matches_text("python").matches(&r));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        for r in [
            record(1, "", "", false),
            record(-5, "x", "y", true),
            record(0, "ünicode", "ğüşiöç", false),
        ] {
            assert!(matches_text("").matches(&r));
        }
    }

    #[test]
    fn test_text_treats_empty_fields_as_empty() {
        let r = record(1, "", "", false);
        assert!(!matches_text("a").matches(&r));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let r = record(1, "t", "b", false);
        assert!(in_date_range(ts(15, 10), ts(15, 10)).matches(&r));
        assert!(in_date_range(ts(1, 0), ts(15, 10)).matches(&r));
        assert!(in_date_range(ts(15, 10), ts(31, 0)).matches(&r));
        assert!(!in_date_range(ts(15, 11), ts(31, 0)).matches(&r));
        assert!(!in_date_range(ts(1, 0), ts(15, 9)).matches(&r));
    }

    #[test]
    fn test_inverted_date_range_matches_nothing() {
        let r = record(1, "t", "b", false);
        assert!(!in_date_range(ts(31, 0), ts(1, 0)).matches(&r));
    }

    #[test]
    fn test_from_dates_covers_whole_days() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let range = DateRange::from_dates(day, day);
        assert!(range.contains(&ts(15, 0)));
        assert!(range.contains(&day.and_hms_opt(23, 59, 59).unwrap()));
        assert!(!range.contains(&ts(16, 0)));
    }

    #[test]
    fn test_parse_bounds() {
        let range = DateRange::parse("2024-01-01", "2024-01-15").unwrap();
        assert_eq!(range.start, ts(1, 0));
        assert!(range.contains(&ts(15, 23)));

        let range = DateRange::parse("2024-01-01 06:00:00", "2024-01-15 08:00:00").unwrap();
        assert!(!range.contains(&ts(15, 10)));

        assert!(DateRange::parse("soon", "2024-01-15").is_none());
    }

    #[test]
    fn test_score_range_boundaries() {
        for (score, expected) in [(9, false), (10, true), (15, true), (20, true), (21, false)] {
            let r = record(score, "t", "b", false);
            assert_eq!(in_score_range(10, 20).matches(&r), expected, "score {}", score);
        }
    }

    #[test]
    fn test_deletion_visibility() {
        let live = record(1, "t", "b", false);
        let gone = record(1, "t", "b", true);
        assert!(visible_by_deletion(true).matches(&live));
        assert!(visible_by_deletion(true).matches(&gone));
        assert!(visible_by_deletion(false).matches(&live));
        assert!(!visible_by_deletion(false).matches(&gone));
    }
}
