//! CSV tables of [`Row`]s

use crate::output::types::{OutputError, OutputResult};
use crate::records::Row;
use std::path::Path;

/// Writes `rows` to a UTF-8 CSV file at `destination`
///
/// The header follows [`Row::COLUMNS`]. An empty slice writes nothing and
/// returns `Ok(None)`; otherwise the number of rows written is returned.
///
/// # Arguments
///
/// * `rows` - Rows to write, in table order
/// * `destination` - File to create or overwrite
///
/// # Returns
///
/// * `Ok(Some(n))` - `n` rows written after the header
/// * `Ok(None)` - `rows` was empty and no file was touched
/// * `Err(OutputError)` - The file could not be created or written
pub fn write_table(rows: &[Row], destination: &Path) -> OutputResult<Option<usize>> {
    if rows.is_empty() {
        return Ok(None);
    }

    let mut writer = csv::Writer::from_path(destination)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    tracing::info!("Saved {} ({} rows)", destination.display(), rows.len());
    Ok(Some(rows.len()))
}

/// Reads a table written by [`write_table`]
pub fn read_table(source: &Path) -> OutputResult<Vec<Row>> {
    let mut reader = csv::Reader::from_path(source)?;

    let headers = reader.headers()?;
    if !headers.iter().eq(Row::COLUMNS.iter().copied()) {
        return Err(OutputError::Header(
            headers.iter().collect::<Vec<_>>().join(","),
        ));
    }

    reader
        .deserialize()
        .collect::<Result<Vec<Row>, csv::Error>>()
        .map_err(OutputError::from)
}
