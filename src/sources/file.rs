//! Reader for downloaded stats-site CSV exports.
//!
//! Exports carry a citation preamble above the real header row, and long
//! tables repeat the header mid-file. Locate the `Rk,Team` header, parse from
//! there, and drop the repeats.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::error::{OracleError, Result};
use crate::domain::RawRow;

/// The marker the real header row starts with.
const HEADER_PREFIX: &str = "Rk,Team";

pub fn read_export<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>> {
    let text = fs::read_to_string(path.as_ref())?;
    debug!(path = %path.as_ref().display(), "reading export");
    parse_export(&text)
}

/// Parse export text: skip the preamble, read the delimited table, drop
/// repeated header rows embedded in the data.
pub fn parse_export(text: &str) -> Result<Vec<RawRow>> {
    let skip = text
        .lines()
        .position(|line| line.starts_with(HEADER_PREFIX))
        .ok_or_else(|| {
            OracleError::MissingField(format!("no '{HEADER_PREFIX}' header row in export"))
        })?;

    let table: String = text
        .lines()
        .skip(skip)
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(table.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        // Repeated header row in the middle of the table.
        if record.get(0) == Some("Rk") {
            continue;
        }
        let raw: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        if !raw.is_empty() {
            rows.push(raw);
        }
    }
    Ok(rows)
}
