//! # farmdesk-core - Core Domain Types
//!
//! Foundation crate for Farmdesk. Provides the resource catalogue, loosely
//! typed records, change diffs, CSV output, response-envelope normalisation,
//! field validation, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, serde_json, thiserror, regex, tracing).
//!
//! ## Public API
//!
//! ### Records (`record`)
//! - [`Record`] - A backend row (ordered JSON object)
//! - [`display_value()`] - String coercion used by tables, diffs and CSV
//!
//! ### Resources (`resource`)
//! - [`Resource`] - Backend collections with path, columns and form fields
//! - [`ColumnDef`], [`FieldSpec`], [`FieldKind`]
//!
//! ### Change Diff (`diff`)
//! - [`compute_changes()`] - Field-level diff for confirmation dialogs
//! - [`FieldChange`]
//!
//! ### Envelopes (`envelope`)
//! - [`Page`] - Normalised `(rows, total)`
//! - [`normalize_list()`], [`normalize_record()`]
//!
//! ### CSV (`csv`)
//! - [`escape_csv()`], [`to_csv()`], [`to_csv_with_columns()`], [`csv::template()`]
//!
//! ### Validation (`validation`)
//! - [`validate_fields()`], [`parse_input()`], [`FieldErrors`]
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use farmdesk_core::prelude::*;
//! ```

pub mod csv;
pub mod diff;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod record;
pub mod resource;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use csv::{escape_csv, to_csv, to_csv_with_columns};
pub use diff::{compute_changes, compute_changes_unlabeled, FieldChange};
pub use envelope::{normalize_list, normalize_record, ListEnvelope, Page};
pub use error::{Error, Result, ResultExt};
pub use record::{display_field, display_value, record_from_pairs, record_id, Record};
pub use resource::{ColumnDef, DeleteStyle, FieldKind, FieldSpec, Resource, UpdateVerb};
pub use validation::{parse_input, validate_fields, validate_value, FieldErrors};
