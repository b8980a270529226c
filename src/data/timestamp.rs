//! Tolerant timestamp parsing
//!
//! Exports are not consistent about how `tarih` is written. The canonical
//! form is `YYYY-MM-DD HH:MM:SS`, but ISO-8601 variants (with a `T`
//! separator, fractional seconds, or a UTC offset) and bare dates show up
//! too. Anything with an offset is converted to UTC; naive values are taken
//! as UTC already.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Canonical on-disk timestamp format
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &[
    CANONICAL_FORMAT,
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

// Every layout with a numeric offset: `T` or space separator, seconds
// (optionally fractional) or minute precision, and `+hh:mm`, `+hhmm` or `+hh`
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M%#z",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a timestamp in any of the accepted layouts
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    if let Some(dt) = parse_naive(value) {
        return Some(dt);
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.naive_utc());
        }
    }

    // `Z` designator on layouts RFC 3339 does not cover, e.g. minute precision
    let zulu = value.strip_suffix('Z').or_else(|| value.strip_suffix('z'))?;
    parse_naive(zulu)
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| parse_date(value).map(start_of_day))
}

/// Parse a bare `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// First instant of a calendar day
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable instant of a calendar day
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// Format a timestamp the way the source export writes it
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(CANONICAL_FORMAT).to_string()
}

/// Serde adapter writing timestamps in the canonical export layout and
/// reading any layout [`parse_timestamp`] accepts
pub mod serde_format {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(timestamp))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("unrecognised timestamp '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_canonical_format() {
        assert_eq!(
            parse_timestamp("2024-01-15 10:30:00"),
            Some(expected(10, 30, 0))
        );
    }

    #[test]
    fn test_iso_variants() {
        assert_eq!(
            parse_timestamp("2024-01-15T10:30:00"),
            Some(expected(10, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-15T10:30:00Z"),
            Some(expected(10, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-15T10:30:00.250"),
            Some(expected(10, 30, 0) + chrono::Duration::milliseconds(250))
        );
    }

    #[test]
    fn test_offsets_are_normalized_to_utc() {
        assert_eq!(
            parse_timestamp("2024-01-15T13:30:00+03:00"),
            Some(expected(10, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-15 13:30:00+03:00"),
            Some(expected(10, 30, 0))
        );
    }

    #[test]
    fn test_offset_spellings() {
        let cases = [
            "2024-01-15T13:30:00+0300",
            "2024-01-15T13:30:00+03",
            "2024-01-15 13:30:00+0300",
            "2024-01-15T13:30+03:00",
            "2024-01-15T13:30+0300",
            "2024-01-15 13:30+03:00",
            "2024-01-15T08:30:00-02",
            "2024-01-15 13:30:00 +03:00",
        ];
        for value in cases {
            assert_eq!(
                parse_timestamp(value),
                Some(expected(10, 30, 0)),
                "parsing '{}'",
                value
            );
        }

        assert_eq!(
            parse_timestamp("2024-01-15T13:30:00.5+0300"),
            Some(expected(10, 30, 0) + chrono::Duration::milliseconds(500))
        );
    }

    #[test]
    fn test_zulu_minute_precision() {
        assert_eq!(parse_timestamp("2024-01-15T10:30Z"), Some(expected(10, 30, 0)));
        assert_eq!(parse_timestamp("2024-01-15 10:30Z"), Some(expected(10, 30, 0)));
        assert_eq!(parse_timestamp("Z"), None);
    }

    #[test]
    fn test_bare_date_is_midnight() {
        assert_eq!(parse_timestamp("2024-01-15"), Some(expected(0, 0, 0)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        for value in ["", "   ", "yesterday", "2024-13-01 00:00:00", "15/01/2024"] {
            assert_eq!(parse_timestamp(value), None, "accepted '{}'", value);
        }
    }

    #[test]
    fn test_day_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(start_of_day(date), expected(0, 0, 0));
        assert!(end_of_day(date) > expected(23, 59, 59));
        assert!(end_of_day(date) < start_of_day(date.succ_opt().unwrap()));
    }

    #[test]
    fn test_format_round_trip() {
        let ts = expected(10, 30, 0);
        assert_eq!(format_timestamp(&ts), "2024-01-15 10:30:00");
    }
}
