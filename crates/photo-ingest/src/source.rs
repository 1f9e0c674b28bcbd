//! CSV record source
//!
//! Reads the whole file into memory in row order. Rows are not validated
//! beyond CSV syntax: a short row simply lacks its trailing columns.

use crate::error::{IngestError, Result};
use crate::record::Record;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read every record from a CSV file with a header row
pub fn read_records(path: impl AsRef<Path>, limit: Option<usize>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    info!(path = %path.display(), "Reading records");

    let file = std::fs::File::open(path)?;
    let records = read_from(file, limit).map_err(|source| IngestError::Source {
        path: path.to_path_buf(),
        source,
    })?;

    info!(count = records.len(), "Loaded records");
    Ok(records)
}

/// Read records from any CSV reader
pub fn read_records_from<R: Read>(reader: R, limit: Option<usize>) -> Result<Vec<Record>> {
    read_from(reader, limit).map_err(|source| IngestError::Source {
        path: PathBuf::from("<reader>"),
        source,
    })
}

fn read_from<R: Read>(reader: R, limit: Option<usize>) -> std::result::Result<Vec<Record>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    debug!(columns = headers.len(), "Parsed CSV header");

    let mut records = Vec::new();
    for row in reader.records() {
        if limit.is_some_and(|max| records.len() >= max) {
            break;
        }
        let row = row?;
        records.push(Record::from_pairs(headers.iter().zip(row.iter())));
    }

    Ok(records)
}
