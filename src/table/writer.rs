//! Writes exported album state as a table.

use chrono::{DateTime, Local};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, TableError};
use crate::exporter::ExportRow;
use crate::model::AlbumRole;

use super::{user_column, DELIMITER, REQUIRED_COLUMNS};

/// Default export file name for the given time, `albums_YYYYMMDD_HHMMSS.csv`.
#[must_use]
pub fn default_output_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("albums_{}.csv", now.format("%Y%m%d_%H%M%S")))
}

/// Writes export rows to a table file, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_export(path: &Path, rows: &[ExportRow]) -> Result<()> {
    let file = File::create(path)?;
    write_rows(file, rows)?;

    info!("Created table file: {}", path.display());
    Ok(())
}

/// Writes export rows as a table.
///
/// Every row is padded with empty cells to the widest album.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_rows<W: Write>(output: W, rows: &[ExportRow]) -> Result<()> {
    let width = rows.iter().map(|row| row.users.len()).max().unwrap_or(0);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(output);

    let mut header: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| (*c).to_string()).collect();
    header.extend((1..=width).map(user_column));
    writer.write_record(&header).map_err(csv_error)?;

    for row in rows {
        let role = row.role.map(AlbumRole::as_str).unwrap_or_default();
        let mut record: Vec<&str> = vec![row.album_name.as_str(), row.album_id.as_str(), role];
        record.extend(row.users.iter().map(String::as_str));
        record.resize(REQUIRED_COLUMNS.len() + width, "");
        writer.write_record(&record).map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

fn csv_error(e: csv::Error) -> TableError {
    TableError::csv(e.to_string())
}
