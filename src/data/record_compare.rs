use crate::data::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Field a record sequence can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Timestamp,
    Score,
    Title,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Timestamp, SortKey::Score, SortKey::Title];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Timestamp => "timestamp",
            SortKey::Score => "score",
            SortKey::Title => "title",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    /// Accepts the English key names and the archive's own column names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" | "date" | "tarih" => Ok(SortKey::Timestamp),
            "score" | "skor" => Ok(SortKey::Score),
            "title" | "baslik" => Ok(SortKey::Title),
            other => Err(format!(
                "unknown sort key '{}' (expected timestamp, score or title)",
                other
            )),
        }
    }
}

/// Compare two records on one key.
///
/// Title ordering is case-sensitive and byte-wise, so "Zebra" sorts before
/// "apple". Search is case-insensitive; sorting deliberately is not.
pub fn compare_records(a: &Record, b: &Record, key: SortKey) -> Ordering {
    match key {
        SortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
        SortKey::Score => a.score.cmp(&b.score),
        SortKey::Title => a.title.cmp(&b.title),
    }
}

/// Compare with direction applied to the comparator result, so a stable sort
/// keeps ties in their original order either way
pub fn compare_directed(a: &Record, b: &Record, key: SortKey, ascending: bool) -> Ordering {
    let cmp = compare_records(a, b, key);
    if ascending {
        cmp
    } else {
        cmp.reverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(score: i64, title: &str, day: u32) -> Record {
        let ts = NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Record::new(score, title, "", false, ts)
    }

    #[test]
    fn test_score_comparison_is_numeric() {
        assert_eq!(
            compare_records(&record(9, "", 1), &record(10, "", 1), SortKey::Score),
            Ordering::Less
        );
        assert_eq!(
            compare_records(&record(-3, "", 1), &record(-20, "", 1), SortKey::Score),
            Ordering::Greater
        );
    }

    #[test]
    fn test_timestamp_comparison() {
        assert_eq!(
            compare_records(&record(0, "", 2), &record(0, "", 10), SortKey::Timestamp),
            Ordering::Less
        );
    }

    #[test]
    fn test_title_comparison_is_case_sensitive() {
        assert_eq!(
            compare_records(&record(0, "Zebra", 1), &record(0, "apple", 1), SortKey::Title),
            Ordering::Less
        );
    }

    #[test]
    fn test_descending_reverses_but_keeps_ties_equal() {
        let a = record(1, "", 1);
        let b = record(2, "", 1);
        assert_eq!(compare_directed(&a, &b, SortKey::Score, false), Ordering::Greater);
        assert_eq!(
            compare_directed(&a, &a.clone(), SortKey::Score, false),
            Ordering::Equal
        );
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("score".parse::<SortKey>(), Ok(SortKey::Score));
        assert_eq!("Tarih".parse::<SortKey>(), Ok(SortKey::Timestamp));
        assert_eq!("baslik".parse::<SortKey>(), Ok(SortKey::Title));
        assert!("length".parse::<SortKey>().is_err());
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>(), Ok(key));
        }
    }
}
