//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers for UI modes
//! - `records`: Form, dialog and backend-result handlers

pub(crate) mod keys;
pub(crate) mod records;
pub(crate) mod update;


use std::path::PathBuf;

use farmdesk_api::{ColumnVisibility, ListQuery};
use farmdesk_core::{Record, Resource};

use crate::form::UniqueCheck;
use crate::message::Message;
use crate::request::RequestToken;

// Re-export main entry point
pub use update::{handle_tick, update};

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Fetch the signed-in user's claims
    LoadCurrentUser,

    /// Fetch one page of a resource list
    LoadList {
        resource: Resource,
        token: RequestToken,
        query: ListQuery,
    },

    CreateRecord {
        resource: Resource,
        record: Record,
    },

    UpdateRecord {
        resource: Resource,
        id: String,
        record: Record,
    },

    /// Soft or hard delete depending on the resource
    DeleteRecord {
        resource: Resource,
        id: String,
        deleted_by: String,
    },

    /// Debounced uniqueness checks whose delay has elapsed
    CheckUnique {
        resource: Resource,
        exclude_id: Option<String>,
        checks: Vec<UniqueCheck>,
    },

    /// Push a column selection to the server, fire-and-forget
    SyncColumns {
        key: String,
        columns: ColumnVisibility,
    },

    /// Write a CSV export or template
    WriteCsv { path: PathBuf, content: String },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
