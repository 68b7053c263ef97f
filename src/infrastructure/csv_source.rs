//! CSV input reader.
//!
//! Turns a `City,Region,Number_of_Galamsay_Sites` file into [`RawRecord`]s.
//! The reader only checks structure (readable file, well-formed CSV, required
//! headers present); cell contents are judged later by the validator.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::domain::entities::{REQUIRED_COLUMNS, RawRecord};
use crate::error::PipelineError;

/// Reads every data row of the CSV file at `path`.
///
/// The file handle is closed on every return path.
///
/// # Errors
///
/// - [`PipelineError::Input`] if the file cannot be opened
/// - [`PipelineError::Csv`] if the content is not valid CSV
/// - [`PipelineError::MissingColumns`] if a required header is absent
pub fn read_raw_records(path: &Path) -> Result<Vec<RawRecord>, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::Input {
        path: path.to_path_buf(),
        source,
    })?;

    parse_raw_records(file, path)
}

/// Parses CSV content from any reader. `path` is only used in error messages.
///
/// # Errors
///
/// Same as [`read_raw_records`], minus the open failure.
pub fn parse_raw_records<R: Read>(reader: R, path: &Path) -> Result<Vec<RawRecord>, PipelineError> {
    let csv_error = |source: csv::Error| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut rows = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(csv_error)?;
        let line = index as u64 + 1;

        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header, record.get(i).unwrap_or("")));

        rows.push(RawRecord::from_pairs(line, fields));
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "Parsed CSV input");

    Ok(rows)
}
