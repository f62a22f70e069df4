//! Headless command runners
//!
//! `export` fetches one page and writes the columns the user has visible in
//! the dashboard; `template` writes the header-only upload template.

use std::path::PathBuf;

use chrono::Local;
use tracing::info;

use farmdesk_api::{Backend, ListQuery};
use farmdesk_app::columns::ColumnState;
use farmdesk_app::config::snap_page_size;
use farmdesk_app::{export, DynPreferences, Settings};
use farmdesk_core::prelude::*;
use farmdesk_core::Resource;

use super::HeadlessEvent;

/// Options of `farmdesk export`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub resource: Resource,
    pub page: u32,
    /// Defaults to the stored page size for the resource
    pub page_size: Option<u32>,
    pub search: Option<String>,
    /// Defaults to a timestamped file in the export directory
    pub out: Option<PathBuf>,
}

impl ExportRequest {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            page: 1,
            page_size: None,
            search: None,
            out: None,
        }
    }
}

/// Fetch one page of `request.resource` and write it as CSV.
pub async fn run_export<B>(
    backend: &B,
    settings: &Settings,
    prefs: &DynPreferences,
    request: ExportRequest,
) -> Result<HeadlessEvent>
where
    B: Backend,
{
    let resource = request.resource;
    let page_size = request
        .page_size
        .or_else(|| prefs.page_size(resource))
        .map(snap_page_size)
        .unwrap_or_else(|| settings.ui.effective_page_size());

    let mut query = ListQuery::new(request.page, page_size);
    if let Some(search) = &request.search {
        query = query.with_search(search);
    }

    info!(
        "Exporting {} page {} ({} per page)",
        resource.slug(),
        query.page,
        page_size
    );
    let page = backend.list(resource, &query).await?;

    let storage_key = resource.columns_storage_key();
    let columns = ColumnState::with_stored(
        resource.columns(),
        prefs.column_visibility(&storage_key).as_ref(),
    )
    .visible_columns();
    let content = export::page_csv(&page.rows, &columns);

    let path = output_path(request.out, settings, || {
        export::export_file_name(resource, Local::now())
    });
    let path = export::write_export(&path, &content)?;

    Ok(HeadlessEvent::export_written(
        resource,
        &path,
        page.rows.len(),
        page.total,
        query.page,
    ))
}

/// Write the upload template for `resource`.
pub fn run_template(
    settings: &Settings,
    resource: Resource,
    out: Option<PathBuf>,
) -> Result<HeadlessEvent> {
    let path = output_path(out, settings, || export::template_file_name(resource));
    let path = export::write_export(&path, &export::template_csv(resource))?;
    Ok(HeadlessEvent::template_written(resource, &path))
}

fn output_path<F>(out: Option<PathBuf>, settings: &Settings, default_name: F) -> PathBuf
where
    F: FnOnce() -> String,
{
    out.unwrap_or_else(|| {
        let dir = settings.export.resolved_directory();
        dir.join(default_name())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_in(dir: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        settings.export.directory = Some(dir.to_path_buf());
        settings
    }

    #[test]
    fn test_output_path_prefers_explicit_file() {
        let settings = Settings::default();
        let path = output_path(Some(PathBuf::from("/tmp/out.csv")), &settings, || {
            "ignored.csv".to_string()
        });
        assert_eq!(path, PathBuf::from("/tmp/out.csv"));
    }

    #[test]
    fn test_output_path_defaults_to_export_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let settings = settings_in(temp.path());
        let path = output_path(None, &settings, || "farmers-template.csv".to_string());

        assert_eq!(path, temp.path().join("farmers-template.csv"));
    }
}
