//! Backend abstraction used by the dashboard
//!
//! The TUI and the headless commands only talk to the backend through this
//! trait, so tests can swap in an in-memory implementation.

use std::collections::BTreeMap;

use farmdesk_core::{Page, Record, Resource};

use crate::error::ApiError;
use crate::query::ListQuery;
use crate::user::CurrentUser;

/// Column visibility as sent to the column-sync endpoint.
pub type ColumnVisibility = BTreeMap<String, bool>;

/// Admin backend operations
#[trait_variant::make(Backend: Send)]
pub trait LocalBackend {
    /// Fetch one page of a resource
    async fn list(&self, resource: Resource, query: &ListQuery) -> Result<Page, ApiError>;

    /// Fetch a single record by id
    async fn get(&self, resource: Resource, id: &str) -> Result<Record, ApiError>;

    /// Create a record and return what the backend stored
    async fn create(&self, resource: Resource, record: &Record) -> Result<Record, ApiError>;

    /// Update a record (PATCH or PUT depending on the resource)
    async fn update(&self, resource: Resource, id: &str, record: &Record)
        -> Result<Record, ApiError>;

    /// Delete a record, soft or hard depending on the resource
    async fn delete(&self, resource: Resource, id: &str, deleted_by: &str) -> Result<(), ApiError>;

    /// Whether `value` is still free for `field`. `exclude_id` skips the
    /// record being edited.
    async fn check_unique(
        &self,
        resource: Resource,
        field: &str,
        value: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, ApiError>;

    /// Push column visibility for a table to the server
    async fn save_columns(&self, key: &str, columns: &ColumnVisibility) -> Result<(), ApiError>;

    /// The signed-in user and their claims
    async fn current_user(&self) -> Result<CurrentUser, ApiError>;
}
