//! Farmdesk - terminal admin dashboard for farm, advisor and visit management
//!
//! The binary wires the workspace crates together; this library holds the
//! headless commands so they can be tested without a terminal.

pub mod headless;

pub use headless::runner::{run_export, run_template, ExportRequest};
pub use headless::HeadlessEvent;
