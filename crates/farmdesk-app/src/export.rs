//! CSV exports and upload templates written to the export directory

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use farmdesk_core::prelude::*;
use farmdesk_core::{csv, to_csv_with_columns, ColumnDef, Record, Resource};

use crate::config::write_atomic;

/// `<resource>-<YYYYmmdd-HHMMSS>.csv`
pub fn export_file_name(resource: Resource, at: DateTime<Local>) -> String {
    format!("{}-{}.csv", resource.slug(), at.format("%Y%m%d-%H%M%S"))
}

/// `<resource>-template.csv`
pub fn template_file_name(resource: Resource) -> String {
    format!("{}-template.csv", resource.slug())
}

/// Rows of the current page restricted to the visible columns.
pub fn page_csv(rows: &[Record], columns: &[ColumnDef]) -> String {
    let columns: Vec<&ColumnDef> = columns.iter().collect();
    to_csv_with_columns(rows, &columns)
}

/// Header-only upload template listing the resource's form fields.
pub fn template_csv(resource: Resource) -> String {
    let keys: Vec<&str> = resource.fields().iter().map(|f| f.key).collect();
    csv::template(&keys)
}

/// Write an export, creating the directory if needed.
pub fn write_export(path: &Path, content: &str) -> Result<PathBuf> {
    write_atomic(path, content)
        .map_err(|e| Error::export(format!("Failed to write {}: {}", path.display(), e)))?;
    info!("Wrote export {}", path.display());
    Ok(path.to_path_buf())
}
