//! Delimited export -> RecordSet, rejecting malformed rows instead of failing

use crate::data::record::{
    Record, RecordSet, COLUMN_BODY, COLUMN_DELETED, COLUMN_SCORE, COLUMN_TIMESTAMP, COLUMN_TITLE,
    REQUIRED_COLUMNS,
};
use crate::data::timestamp::parse_timestamp;
use anyhow::{Context, Result};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// A raw row keyed by column name
pub type RawRow = HashMap<String, String>;

const TRUE_TOKEN: &str = "true";

/// Structural problems that abort a whole conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("input has no header row")]
    MissingHeader,

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("header row could not be read: {0}")]
    Unreadable(String),
}

/// Why a single row was left out of the record set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("score '{0}' is not an integer")]
    InvalidScore(String),

    #[error("timestamp '{0}' could not be parsed")]
    InvalidTimestamp(String),

    #[error("row has no value for column '{0}'")]
    MissingField(&'static str),

    #[error("row could not be read: {0}")]
    Malformed(String),
}

/// A rejected row and where it came from.
///
/// `line` is the 1-based source line for delimited input and the 1-based row
/// number for field-map input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct RowRejection {
    pub line: u64,
    pub reason: RejectReason,
}

/// Output of one normalization run
#[derive(Debug, Clone, Default)]
pub struct NormalizedSet {
    pub records: RecordSet,
    pub rejected: Vec<RowRejection>,
}

impl NormalizedSet {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Number of data rows seen in the input
    pub fn rows_seen(&self) -> usize {
        self.records.len() + self.rejected.len()
    }
}

/// Normalize delimited text with a header row
pub fn normalize(raw_text: &str) -> Result<NormalizedSet, SchemaError> {
    normalize_reader(raw_text.as_bytes())
}

/// Normalize a UTF-8 export file
pub fn normalize_path<P: AsRef<Path>>(path: P) -> Result<NormalizedSet> {
    let path = path.as_ref();
    info!("Normalizing {}", path.display());

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let normalized =
        normalize_reader(file).with_context(|| format!("Invalid export {}", path.display()))?;
    Ok(normalized)
}

/// Normalize delimited text from any reader
pub fn normalize_reader<R: Read>(reader: R) -> Result<NormalizedSet, SchemaError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| SchemaError::Unreadable(e.to_string()))?
        .clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(SchemaError::MissingHeader);
    }

    let layout = ColumnLayout::resolve(headers.iter())?;

    let mut records = Vec::new();
    let mut rejected = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        // Header occupies line 1, so the first data row is line 2 unless quoting spans lines
        let fallback_line = row_idx as u64 + 2;

        let outcome = match result {
            Ok(row) => {
                let line = row.position().map_or(fallback_line, |p| p.line());
                let parsed =
                    build_record(|column| layout.index_of(column).and_then(|i| row.get(i)));
                (line, parsed)
            }
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                (line, Err(RejectReason::Malformed(e.to_string())))
            }
        };

        match outcome {
            (_, Ok(record)) => records.push(record),
            (line, Err(reason)) => {
                debug!("Rejected row at line {}: {}", line, reason);
                rejected.push(RowRejection { line, reason });
            }
        }
    }

    Ok(finish(records, rejected))
}

/// Normalize rows that were already split into column -> value maps
pub fn normalize_rows<I>(rows: I) -> Result<NormalizedSet, SchemaError>
where
    I: IntoIterator,
    I::Item: Borrow<RawRow>,
{
    let mut records = Vec::new();
    let mut rejected = Vec::new();

    for (row_idx, row) in rows.into_iter().enumerate() {
        let row = row.borrow();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !row.contains_key(**column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns(missing));
        }

        match build_record(|column| row.get(column).map(String::as_str)) {
            Ok(record) => records.push(record),
            Err(reason) => {
                let line = row_idx as u64 + 1;
                debug!("Rejected row {}: {}", line, reason);
                rejected.push(RowRejection { line, reason });
            }
        }
    }

    Ok(finish(records, rejected))
}

fn finish(records: Vec<Record>, rejected: Vec<RowRejection>) -> NormalizedSet {
    info!(
        "Normalization complete: {} records accepted, {} rejected",
        records.len(),
        rejected.len()
    );

    NormalizedSet {
        records: RecordSet::new(records),
        rejected,
    }
}

/// Positions of the required columns within a header row
struct ColumnLayout {
    positions: [usize; REQUIRED_COLUMNS.len()],
}

impl ColumnLayout {
    fn resolve<'a>(headers: impl Iterator<Item = &'a str>) -> Result<Self, SchemaError> {
        let names: Vec<&str> = headers
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();

        let mut positions = [0; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, column) in REQUIRED_COLUMNS.iter().enumerate() {
            match names.iter().position(|name| name == column) {
                Some(idx) => positions[slot] = idx,
                None => missing.push(column.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns(missing));
        }
        Ok(Self { positions })
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        REQUIRED_COLUMNS
            .iter()
            .position(|c| *c == column)
            .and_then(|slot| self.positions.get(slot).copied())
    }
}

/// Coerce one row's fields into a Record
fn build_record<'a, F>(field: F) -> Result<Record, RejectReason>
where
    F: Fn(&'static str) -> Option<&'a str>,
{
    let require = |column: &'static str| field(column).ok_or(RejectReason::MissingField(column));

    let raw_score = require(COLUMN_SCORE)?;
    let score = raw_score
        .trim()
        .parse::<i64>()
        .map_err(|_| RejectReason::InvalidScore(raw_score.to_string()))?;

    let raw_timestamp = require(COLUMN_TIMESTAMP)?;
    let timestamp = parse_timestamp(raw_timestamp)
        .ok_or_else(|| RejectReason::InvalidTimestamp(raw_timestamp.to_string()))?;

    let deleted = require(COLUMN_DELETED)?
        .trim()
        .eq_ignore_ascii_case(TRUE_TOKEN);

    Ok(Record {
        score,
        title: require(COLUMN_TITLE)?.trim().to_string(),
        body: require(COLUMN_BODY)?.trim().to_string(),
        deleted,
        timestamp,
    })
}
