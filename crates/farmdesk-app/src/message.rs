//! Message types for the application (TEA pattern)

use std::path::PathBuf;

use farmdesk_api::{ApiError, CurrentUser};
use farmdesk_core::{FieldErrors, Page, Record, Resource};

use crate::input_key::{InputKey, MouseClick};
use crate::request::RequestToken;
use crate::signals::ShutdownSignal;

/// A failed backend call, reduced to what the UI needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    /// The backend answered 401
    pub unauthorized: bool,
    pub status: Option<u16>,
    /// User-facing text with details hidden
    pub message: String,
    /// User-facing text including transport/decoding details
    pub detail: String,
    pub field_errors: FieldErrors,
}

impl RequestFailure {
    pub fn from_api(error: &ApiError) -> Self {
        Self {
            unauthorized: error.is_unauthorized(),
            status: error.status(),
            message: error.user_message(false),
            detail: error.user_message(true),
            field_errors: error.field_errors(),
        }
    }

    /// Text for the alert modal, honoring `ui.show_error_details`.
    pub fn display(&self, show_details: bool) -> &str {
        if show_details {
            &self.detail
        } else {
            &self.message
        }
    }
}

impl From<ApiError> for RequestFailure {
    fn from(error: ApiError) -> Self {
        Self::from_api(&error)
    }
}

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Left mouse click
    MouseClick(MouseClick),

    /// Periodic tick: spinner, debounced checks, modal unmounting
    Tick,

    /// Request to quit (may show a confirmation dialog)
    RequestQuit,

    /// Quit without confirmation (Ctrl+C)
    Quit,
    /// OS signal; quits without confirmation
    Shutdown(ShutdownSignal),

    // ─────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────
    UserLoaded(CurrentUser),
    UserLoadFailed(RequestFailure),

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// Tab between sidebar and table
    SwitchFocus,
    OpenScreen(Resource),
    MenuUp,
    MenuDown,
    MenuActivate,
    StartMenuSearch,
    MenuSearchInput(char),
    MenuSearchBackspace,
    /// Leave the search box; `clear` also drops the query
    EndMenuSearch { clear: bool },

    // ─────────────────────────────────────────────────────────
    // List
    // ─────────────────────────────────────────────────────────
    Refresh,
    ListLoaded {
        resource: Resource,
        token: RequestToken,
        page: Page,
    },
    ListFailed {
        resource: Resource,
        token: RequestToken,
        failure: RequestFailure,
    },
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    NextPage,
    PrevPage,
    CyclePageSize,
    StartFilter,
    FilterInput(char),
    FilterBackspace,
    SubmitFilter,
    CancelFilter,

    // ─────────────────────────────────────────────────────────
    // Column selector
    // ─────────────────────────────────────────────────────────
    OpenColumnSelector,
    ColumnSelectorKey(InputKey),

    // ─────────────────────────────────────────────────────────
    // Forms and dialogs
    // ─────────────────────────────────────────────────────────
    OpenCreateForm,
    OpenEditForm,
    FormInput(char),
    FormBackspace,
    FormFocusNext,
    FormFocusPrev,
    FormCycle { forward: bool },
    SubmitForm,
    ConfirmKey(InputKey),
    DismissAlert,
    /// Close the topmost modal (Esc, Cancel, backdrop click)
    CloseModal,
    RequestDelete,

    // ─────────────────────────────────────────────────────────
    // Backend results
    // ─────────────────────────────────────────────────────────
    RecordSaved {
        resource: Resource,
        record: Record,
        created: bool,
    },
    SaveFailed {
        resource: Resource,
        failure: RequestFailure,
    },
    RecordDeleted {
        resource: Resource,
        id: String,
    },
    DeleteFailed {
        resource: Resource,
        failure: RequestFailure,
    },
    UniqueChecked {
        resource: Resource,
        field: String,
        token: RequestToken,
        available: bool,
    },
    UniqueCheckFailed {
        resource: Resource,
        field: String,
        token: RequestToken,
        failure: RequestFailure,
    },

    // ─────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────
    ExportCsv,
    ExportTemplate,
    ExportWritten { path: PathBuf },
    ExportFailed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_from_unauthorized() {
        let failure = RequestFailure::from(ApiError::Unauthorized);
        assert!(failure.unauthorized);
        assert_eq!(failure.status, Some(401));
        assert_eq!(failure.message, farmdesk_api::SESSION_EXPIRED_MESSAGE);
    }

    #[test]
    fn test_failure_hides_server_details() {
        let failure = RequestFailure::from(ApiError::server(500, "stored procedure failed"));
        assert_eq!(failure.display(false), farmdesk_api::GENERIC_MESSAGE);
        assert!(failure.display(true).contains("stored procedure failed"));
    }

    #[test]
    fn test_failure_keeps_client_error_message() {
        let failure = RequestFailure::from(ApiError::server(409, "Username taken"));
        assert_eq!(failure.display(false), "Username taken");
        assert!(!failure.unauthorized);
    }
}
