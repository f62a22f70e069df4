//! Application state (Model in TEA pattern)

use std::time::Instant;

use farmdesk_api::CurrentUser;
use farmdesk_core::prelude::*;
use farmdesk_core::Resource;

use crate::alert::AlertState;
use crate::auth::{Action, Capabilities, Claims};
use crate::columns::ColumnState;
use crate::config::{snap_page_size, Settings};
use crate::confirm_dialog::{ConfirmDialogState, PendingOperation};
use crate::list::ListState;
use crate::menu::MenuState;
use crate::message::RequestFailure;
use crate::modal::{Modal, ModalKind, ModalOptions, ModalStack, ModalWidth};
use crate::preferences::{DynPreferences, MemoryStore};

/// Current UI mode/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Sidebar and table take keys
    #[default]
    Normal,

    /// Typing the table filter
    FilterInput,

    /// Typing in the sidebar search box
    MenuSearch,

    /// Column visibility popover is open
    ColumnSelector,

    /// The backend rejected the session; only retry and quit are offered
    LoginRequired,
}

/// Region of the main layout holding keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusRegion {
    Sidebar,
    #[default]
    Table,
}

impl FocusRegion {
    pub fn toggle(self) -> Self {
        match self {
            FocusRegion::Sidebar => FocusRegion::Table,
            FocusRegion::Table => FocusRegion::Sidebar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Where the signed-in user stands with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// `GET /auth/me` in flight
    #[default]
    Loading,
    SignedIn,
    /// Claims could not be loaded; only unrestricted screens are shown
    Anonymous,
    /// A request answered 401
    Expired,
}

/// One-line feedback shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// The open resource screen: its list and column selection.
#[derive(Debug, Clone)]
pub struct Screen {
    pub list: ListState,
    pub columns: ColumnState,
}

impl Screen {
    pub fn resource(&self) -> Resource {
        self.list.resource
    }
}

/// Complete application state
pub struct AppState {
    pub ui_mode: UiMode,
    pub focus: FocusRegion,
    pub phase: AppPhase,
    pub settings: Settings,
    pub prefs: DynPreferences,
    pub session: SessionStatus,
    pub capabilities: Capabilities,
    pub menu: MenuState,
    pub screen: Option<Screen>,
    pub modals: ModalStack,
    /// Filter text being typed, applied on Enter
    pub filter_input: String,
    pub status: Option<StatusMessage>,
    /// Spinner animation frame, advanced on every tick while busy
    pub spinner_frame: usize,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("ui_mode", &self.ui_mode)
            .field("focus", &self.focus)
            .field("phase", &self.phase)
            .field("session", &self.session)
            .field("screen", &self.current_resource())
            .field("modals", &self.modals.len())
            .finish_non_exhaustive()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Settings::default(),
            DynPreferences::boxed(MemoryStore::new()),
        )
    }
}

impl AppState {
    pub fn new(settings: Settings, prefs: DynPreferences) -> Self {
        let mut menu = MenuState::default();
        menu.expanded = prefs.sidebar_expanded();
        Self {
            ui_mode: UiMode::Normal,
            focus: FocusRegion::Table,
            phase: AppPhase::Running,
            settings,
            prefs,
            session: SessionStatus::Loading,
            capabilities: Capabilities::default(),
            menu,
            screen: None,
            modals: ModalStack::default(),
            filter_input: String::new(),
            status: None,
            spinner_frame: 0,
        }
    }

    pub fn claims(&self) -> &Claims {
        self.capabilities.claims()
    }

    pub fn can(&self, action: Action, resource: Resource) -> bool {
        self.capabilities.can(action, resource)
    }

    pub fn current_resource(&self) -> Option<Resource> {
        self.screen.as_ref().map(Screen::resource)
    }

    /// Spinner shown in the top bar.
    pub fn is_busy(&self) -> bool {
        self.session == SessionStatus::Loading
            || self.screen.as_ref().is_some_and(|s| s.list.is_loading())
            || self.modals.form().is_some_and(|f| f.submitting)
    }

    /// Username recorded as `DeletedBy` on soft deletes.
    pub fn deleted_by(&self) -> String {
        let username = &self.claims().username;
        if username.is_empty() {
            "unknown".to_string()
        } else {
            username.clone()
        }
    }

    // ─────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────

    pub fn sign_in(&mut self, user: &CurrentUser) {
        self.capabilities = Capabilities::new(Claims::from(user));
        self.session = SessionStatus::SignedIn;
        if self.ui_mode == UiMode::LoginRequired {
            self.ui_mode = UiMode::Normal;
        }
        self.menu.clamp_selection(self.capabilities.claims());
        info!("Signed in as {}", self.claims().username);
    }

    /// Continue with an empty claim set after `/auth/me` failed.
    pub fn sign_in_anonymous(&mut self) {
        self.capabilities = Capabilities::default();
        self.session = SessionStatus::Anonymous;
        self.menu.clamp_selection(self.capabilities.claims());
    }

    /// Enter the login-required state after a 401.
    pub fn require_login(&mut self) {
        warn!("Backend rejected the session");
        self.session = SessionStatus::Expired;
        self.ui_mode = UiMode::LoginRequired;
        if let Some(screen) = self.screen.as_mut() {
            screen.list.cancel();
            screen.columns.close_popover();
        }
        let now = Instant::now();
        while self.modals.close_top(now, self.settings.behavior.modal_exit_delay()).is_some() {}
    }

    // ─────────────────────────────────────────────────────────
    // Screens
    // ─────────────────────────────────────────────────────────

    /// Replace the current screen with `resource`, restoring its stored page
    /// size and column selection.
    pub fn open_screen(&mut self, resource: Resource) {
        if let Some(screen) = self.screen.as_mut() {
            screen.list.cancel();
        }
        let page_size = self
            .prefs
            .page_size(resource)
            .map(snap_page_size)
            .unwrap_or_else(|| self.settings.ui.effective_page_size());
        let storage_key = resource.columns_storage_key();
        let stored = self.prefs.column_visibility(&storage_key);
        let columns =
            ColumnState::with_stored(resource.columns(), stored.as_ref()).with_storage_key(storage_key);
        self.screen = Some(Screen {
            list: ListState::new(resource, page_size),
            columns,
        });
        self.filter_input.clear();
        if matches!(self.ui_mode, UiMode::FilterInput | UiMode::ColumnSelector) {
            self.ui_mode = UiMode::Normal;
        }
        debug!("Opened screen {}", resource.slug());
    }

    // ─────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────

    pub fn open_modal(&mut self, options: ModalOptions, kind: ModalKind) {
        self.modals.push(Modal::new(options, kind, self.focus));
    }

    /// Close the topmost modal and restore the focus it remembered.
    pub fn close_modal(&mut self) {
        let delay = self.settings.behavior.modal_exit_delay();
        if let Some(focus) = self.modals.close_top(Instant::now(), delay) {
            self.focus = focus;
        }
    }

    pub fn show_alert(&mut self, alert: AlertState) {
        let options = ModalOptions::new(alert.title.clone()).width(ModalWidth::Small);
        self.open_modal(options, ModalKind::Alert(alert));
    }

    pub fn show_confirm(&mut self, dialog: ConfirmDialogState) {
        let options = ModalOptions::new(dialog.title.clone())
            .width(if dialog.changes.is_empty() {
                ModalWidth::Small
            } else {
                ModalWidth::Large
            })
            .close_on_backdrop(false);
        self.open_modal(options, ModalKind::Confirm(dialog));
    }

    /// Report a failed request: 401 enters the login-required state,
    /// anything else opens an error alert.
    pub fn show_failure(&mut self, failure: &RequestFailure) {
        if failure.unauthorized {
            self.require_login();
            return;
        }
        let text = failure
            .display(self.settings.ui.show_error_details)
            .to_string();
        self.show_alert(AlertState::error(text));
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    // ─────────────────────────────────────────────────────────
    // Quit
    // ─────────────────────────────────────────────────────────

    /// Request application quit
    pub fn request_quit(&mut self) {
        if self.settings.behavior.confirm_quit {
            if !self.is_quit_pending() {
                self.show_confirm(ConfirmDialogState::quit());
            }
        } else {
            self.phase = AppPhase::Quitting;
        }
    }

    fn is_quit_pending(&self) -> bool {
        matches!(
            self.modals.top().map(|m| &m.kind),
            Some(ModalKind::Confirm(d)) if d.operation == PendingOperation::Quit
        )
    }

    /// Force quit without confirmation
    pub fn force_quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }

    /// Confirm quit (from confirmation dialog)
    pub fn confirm_quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }

    /// Cancel quit (from confirmation dialog)
    pub fn cancel_quit(&mut self) {
        self.close_modal();
    }

    /// Check if the app should quit
    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }
}
