use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::data::normalizer::normalize;
use crate::data::record::Record;

/// Handles converting records to the archive's JSON layout
pub struct DataExporter;

impl DataExporter {
    /// Pretty JSON array keyed by the source column names
    pub fn to_json<'a, I>(records: I) -> Result<String>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let records: Vec<&Record> = records.into_iter().collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Read records back from a JSON array produced by [`DataExporter::to_json`]
    pub fn from_json(json: &str) -> Result<Vec<Record>> {
        serde_json::from_str(json).context("Failed to parse archive JSON")
    }

    /// Convert a delimited export straight to JSON. Rejected rows are left
    /// out; structural problems fail the whole conversion.
    pub fn convert_csv_to_json(raw_text: &str) -> Result<String> {
        let normalized = normalize(raw_text)?;
        if normalized.rejected_count() > 0 {
            info!(
                "Dropped {} malformed row(s) during conversion",
                normalized.rejected_count()
            );
        }
        Self::to_json(&normalized.records)
    }

    /// Write records to a JSON file
    pub fn export_to_json_file<'a, I, P>(records: I, path: P) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Record>,
        P: AsRef<Path>,
    {
        let records: Vec<&Record> = records.into_iter().collect();
        if records.is_empty() {
            return Err(anyhow!("No records to export"));
        }

        let path = path.as_ref();
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &records)?;

        info!("Exported {} records to {}", records.len(), path.display());
        Ok(records.len())
    }
}
