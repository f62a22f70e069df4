//! Headless mode - CSV export and templates without the TUI
//!
//! Each command prints one NDJSON event to stdout describing what was
//! written, so scripts can pick up the file path.
//!
//! ```json
//! {"event":"export_written","resource":"farmers","path":"/tmp/farmers.csv","rows":25,"total":120,"page":1,"timestamp":1704700001000}
//! {"event":"error","message":"Session expired","timestamp":1704700002000}
//! ```

pub mod runner;

use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;
use farmdesk_core::Resource;
use serde::Serialize;
use tracing::error;

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// A page of records was exported
    ExportWritten {
        resource: String,
        path: String,
        rows: usize,
        total: u64,
        page: u32,
        timestamp: i64,
    },

    /// An upload template was written
    TemplateWritten {
        resource: String,
        path: String,
        timestamp: i64,
    },

    Error { message: String, timestamp: i64 },
}

impl HeadlessEvent {
    /// Emit this event to stdout as one JSON line
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json).and_then(|_| stdout.flush()) {
            error!("Failed to write headless event to stdout: {}", e);
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn export_written(resource: Resource, path: &Path, rows: usize, total: u64, page: u32) -> Self {
        Self::ExportWritten {
            resource: resource.slug().to_string(),
            path: path.display().to_string(),
            rows,
            total,
            page,
            timestamp: Self::now(),
        }
    }

    pub fn template_written(resource: Resource, path: &Path) -> Self {
        Self::TemplateWritten {
            resource: resource.slug().to_string(),
            path: path.display().to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            timestamp: Self::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_written_serialization() {
        let event =
            HeadlessEvent::export_written(Resource::Farmers, Path::new("/tmp/f.csv"), 25, 120, 2);
        let json = serde_json::to_string(&event).expect("serialization failed");
        let value: serde_json::Value = serde_json::from_str(&json).expect("invalid JSON");

        assert_eq!(value["event"], "export_written");
        assert_eq!(value["resource"], "farmers");
        assert_eq!(value["rows"], 25);
        assert_eq!(value["total"], 120);
        assert_eq!(value["page"], 2);
        assert!(value["timestamp"].is_number());
    }

    #[test]
    fn test_error_serialization() {
        let event = HeadlessEvent::error("Session expired");
        let value = serde_json::to_value(&event).expect("serialization failed");

        assert_eq!(value["event"], "error");
        assert_eq!(value["message"], "Session expired");
    }
}
