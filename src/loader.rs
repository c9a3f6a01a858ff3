//! Startup loading of CSV input files.
//!
//! All input files are read once, fully, before the server binds. Any failure here is fatal.

use crate::error::DashboardError;

use csv::{Reader, ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

/// Open a CSV file with a header row.
pub fn open_reader(path: &Path) -> Result<Reader<File>, DashboardError> {
    let file = File::open(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

/// Deserialise every row of a CSV file into `T`.
///
/// Columns are matched to fields by header name. Extra columns are ignored.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DashboardError> {
    let mut reader = open_reader(path)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| DashboardError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Returns the header row of an open reader.
pub fn headers(path: &Path, reader: &mut Reader<File>) -> Result<StringRecord, DashboardError> {
    reader
        .headers()
        .cloned()
        .map_err(|source| DashboardError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Returns the position of a required column.
pub fn required_column(
    path: &Path,
    headers: &StringRecord,
    name: &str,
) -> Result<usize, DashboardError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| DashboardError::data_file(path, format!("missing column {name}")))
}

/// Parse a numeric cell. Empty cells and `nan` read as NaN.
pub fn parse_value(path: &Path, cell: &str) -> Result<f64, DashboardError> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|err| DashboardError::data_file(path, format!("invalid number {cell:?}: {err}")))
}
