//! Main update function - handles state transitions (TEA pattern)
//!
//! Form, dialog and backend-result handlers live in `records`.

use std::time::Instant;

use farmdesk_core::prelude::*;
use farmdesk_core::Resource;

use crate::alert::AlertState;
use crate::auth::Action;
use crate::columns::ColumnKeyOutcome;
use crate::input_key::{InputKey, MouseClick};
use crate::menu::{visible_resources, MenuActivation};
use crate::message::{Message, RequestFailure};
use crate::state::{AppState, FocusRegion, SessionStatus, UiMode};

use super::{keys::handle_key, records, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::MouseClick(click) => handle_click(state, click),

        Message::Tick => handle_tick(state, Instant::now()),

        Message::RequestQuit => {
            state.request_quit();
            UpdateResult::none()
        }

        Message::Quit => {
            state.force_quit();
            UpdateResult::none()
        }

        Message::Shutdown(signal) => {
            match state.modals.form().filter(|f| f.submitting) {
                Some(form) => warn!(
                    "{} received while saving {}; the result will not be shown",
                    signal.name(),
                    form.resource.slug()
                ),
                None => info!("{} received, quitting", signal.name()),
            }
            state.force_quit();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Session
        // ─────────────────────────────────────────────────────────
        Message::UserLoaded(user) => {
            state.sign_in(&user);
            open_default_screen(state)
        }

        Message::UserLoadFailed(failure) => handle_user_load_failed(state, failure),

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::SwitchFocus => {
            state.focus = state.focus.toggle();
            UpdateResult::none()
        }

        Message::OpenScreen(resource) => handle_open_screen(state, resource),

        Message::MenuUp => {
            let claims = state.capabilities.claims().clone();
            state.menu.select_prev(&claims);
            UpdateResult::none()
        }

        Message::MenuDown => {
            let claims = state.capabilities.claims().clone();
            state.menu.select_next(&claims);
            UpdateResult::none()
        }

        Message::MenuActivate => handle_menu_activate(state),

        Message::StartMenuSearch => {
            state.menu.searching = true;
            state.focus = FocusRegion::Sidebar;
            state.ui_mode = UiMode::MenuSearch;
            UpdateResult::none()
        }

        Message::MenuSearchInput(c) => {
            let claims = state.capabilities.claims().clone();
            state.menu.push_query_char(c, &claims);
            UpdateResult::none()
        }

        Message::MenuSearchBackspace => {
            let claims = state.capabilities.claims().clone();
            state.menu.pop_query_char(&claims);
            UpdateResult::none()
        }

        Message::EndMenuSearch { clear } => {
            if clear {
                state.menu.clear_query();
            } else {
                state.menu.searching = false;
            }
            state.ui_mode = UiMode::Normal;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // List
        // ─────────────────────────────────────────────────────────
        Message::Refresh => {
            if state.session == SessionStatus::Expired {
                state.session = SessionStatus::Loading;
                return UpdateResult::action(UpdateAction::LoadCurrentUser);
            }
            load_list(state)
        }

        Message::ListLoaded {
            resource,
            token,
            page,
        } => {
            let Some(screen) = state.screen.as_mut().filter(|s| s.resource() == resource) else {
                debug!("Dropping list response for closed screen {}", resource.slug());
                return UpdateResult::none();
            };
            if !screen.list.apply_page(token, page) {
                debug!("Dropping stale list response for {}", resource.slug());
                return UpdateResult::none();
            }
            if screen.list.is_past_end() {
                // e.g. the last row of the last page was deleted
                let last = screen.list.page_count();
                if screen.list.go_to_page(last) {
                    return load_list(state);
                }
                warn!(
                    "{} page {} came back empty with total {}",
                    resource.slug(),
                    last,
                    screen.list.total
                );
            }
            UpdateResult::none()
        }

        Message::ListFailed {
            resource,
            token,
            failure,
        } => {
            let show_details = state.settings.ui.show_error_details;
            let Some(screen) = state.screen.as_mut().filter(|s| s.resource() == resource) else {
                return UpdateResult::none();
            };
            if !screen
                .list
                .apply_error(token, failure.display(show_details).to_string())
            {
                debug!("Dropping stale list failure for {}", resource.slug());
                return UpdateResult::none();
            }
            warn!("Loading {} failed: {}", resource.slug(), failure.detail);
            if failure.unauthorized {
                state.require_login();
            }
            UpdateResult::none()
        }

        Message::SelectNext => with_list(state, |list| list.select_next()),
        Message::SelectPrev => with_list(state, |list| list.select_prev()),
        Message::SelectFirst => with_list(state, |list| list.select_first()),
        Message::SelectLast => with_list(state, |list| list.select_last()),

        Message::NextPage => {
            let changed = state.screen.as_mut().is_some_and(|s| s.list.next_page());
            if changed {
                load_list(state)
            } else {
                UpdateResult::none()
            }
        }

        Message::PrevPage => {
            let changed = state.screen.as_mut().is_some_and(|s| s.list.prev_page());
            if changed {
                load_list(state)
            } else {
                UpdateResult::none()
            }
        }

        Message::CyclePageSize => {
            let Some(screen) = state.screen.as_mut() else {
                return UpdateResult::none();
            };
            let resource = screen.resource();
            let size = screen.list.cycle_page_size();
            if let Err(e) = state.prefs.set_page_size(resource, size) {
                warn!("Failed to persist page size: {}", e);
            }
            load_list(state)
        }

        Message::StartFilter => {
            if let Some(screen) = state.screen.as_ref() {
                state.filter_input = screen.list.filter.clone();
                state.ui_mode = UiMode::FilterInput;
            }
            UpdateResult::none()
        }

        Message::FilterInput(c) => {
            state.filter_input.push(c);
            UpdateResult::none()
        }

        Message::FilterBackspace => {
            state.filter_input.pop();
            UpdateResult::none()
        }

        Message::SubmitFilter => {
            state.ui_mode = UiMode::Normal;
            let filter = state.filter_input.clone();
            let changed = state
                .screen
                .as_mut()
                .is_some_and(|s| s.list.set_filter(&filter));
            if changed {
                load_list(state)
            } else {
                UpdateResult::none()
            }
        }

        Message::CancelFilter => {
            state.ui_mode = UiMode::Normal;
            state.filter_input.clear();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Column selector
        // ─────────────────────────────────────────────────────────
        Message::OpenColumnSelector => {
            if let Some(screen) = state.screen.as_mut() {
                screen.columns.open_popover();
                state.ui_mode = UiMode::ColumnSelector;
            }
            UpdateResult::none()
        }

        Message::ColumnSelectorKey(key) => handle_column_key(state, key),

        // ─────────────────────────────────────────────────────────
        // Forms, dialogs and backend results
        // ─────────────────────────────────────────────────────────
        Message::OpenCreateForm => records::open_create_form(state),
        Message::OpenEditForm => records::open_edit_form(state),
        Message::FormInput(c) => records::form_input(state, c),
        Message::FormBackspace => records::form_backspace(state),
        Message::FormFocusNext => records::form_focus(state, true),
        Message::FormFocusPrev => records::form_focus(state, false),
        Message::FormCycle { forward } => records::form_cycle(state, forward),
        Message::SubmitForm => records::submit_form(state),
        Message::ConfirmKey(key) => records::confirm_key(state, key),
        Message::DismissAlert | Message::CloseModal => {
            state.close_modal();
            UpdateResult::none()
        }
        Message::RequestDelete => records::request_delete(state),

        Message::RecordSaved {
            resource, created, ..
        } => records::record_saved(state, resource, created),
        Message::SaveFailed { resource, failure } => records::save_failed(state, resource, failure),
        Message::RecordDeleted { resource, id } => records::record_deleted(state, resource, id),
        Message::DeleteFailed { resource, failure } => {
            records::delete_failed(state, resource, failure)
        }
        Message::UniqueChecked {
            resource,
            field,
            token,
            available,
        } => records::unique_checked(state, resource, &field, token, Ok(available)),
        Message::UniqueCheckFailed {
            resource,
            field,
            token,
            failure,
        } => records::unique_checked(state, resource, &field, token, Err(failure)),

        // ─────────────────────────────────────────────────────────
        // Export
        // ─────────────────────────────────────────────────────────
        Message::ExportCsv => records::export_csv(state),
        Message::ExportTemplate => records::export_template(state),
        Message::ExportWritten { path } => {
            state.set_status(format!("Saved {}", path.display()));
            UpdateResult::none()
        }
        Message::ExportFailed { message } => {
            error!("Export failed: {}", message);
            state.show_alert(AlertState::error(message));
            UpdateResult::none()
        }
    }
}

/// Periodic housekeeping: unmount closed modals, animate the spinner and
/// send uniqueness checks whose debounce elapsed.
pub fn handle_tick(state: &mut AppState, now: Instant) -> UpdateResult {
    state.modals.prune(now);
    if state.is_busy() {
        state.spinner_frame = state.spinner_frame.wrapping_add(1);
    }

    let Some(form) = state.modals.form_mut() else {
        return UpdateResult::none();
    };
    let checks = form.take_due_checks(now);
    if checks.is_empty() {
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::CheckUnique {
        resource: form.resource,
        exclude_id: form.record_id().map(str::to_string),
        checks,
    })
}

fn handle_click(state: &mut AppState, click: MouseClick) -> UpdateResult {
    match state.modals.top() {
        Some(modal) if modal.is_backdrop_click(click.column, click.row) => {
            UpdateResult::message(Message::CloseModal)
        }
        _ => UpdateResult::none(),
    }
}

fn handle_user_load_failed(state: &mut AppState, failure: RequestFailure) -> UpdateResult {
    if failure.unauthorized {
        state.require_login();
        return UpdateResult::none();
    }
    warn!("Could not load the current user: {}", failure.detail);
    state.sign_in_anonymous();
    state.set_error_status("Could not load your permissions; showing public screens only");
    open_default_screen(state)
}

/// Open the first permitted screen when none is open yet.
fn open_default_screen(state: &mut AppState) -> UpdateResult {
    if state.screen.is_some() {
        return load_list(state);
    }
    let claims = state.capabilities.claims();
    let first = visible_resources(state.menu.tree(), claims)
        .into_iter()
        .find(|r| state.capabilities.can(Action::View, *r));
    match first {
        Some(resource) => UpdateResult::message(Message::OpenScreen(resource)),
        None => {
            state.focus = FocusRegion::Sidebar;
            UpdateResult::none()
        }
    }
}

fn handle_open_screen(state: &mut AppState, resource: Resource) -> UpdateResult {
    if !state.can(Action::View, resource) {
        state.set_error_status(format!("You do not have access to {resource}"));
        return UpdateResult::none();
    }
    state.open_screen(resource);
    let claims = state.capabilities.claims().clone();
    state.menu.reveal(resource, &claims);
    state.focus = FocusRegion::Table;
    load_list(state)
}

fn handle_menu_activate(state: &mut AppState) -> UpdateResult {
    let claims = state.capabilities.claims().clone();
    match state.menu.activate(&claims) {
        MenuActivation::Open(resource) => UpdateResult::message(Message::OpenScreen(resource)),
        MenuActivation::Toggled => {
            let expanded = state.menu.expanded.clone();
            if let Err(e) = state.prefs.set_sidebar_expanded(expanded.as_deref()) {
                warn!("Failed to persist sidebar state: {}", e);
            }
            UpdateResult::none()
        }
        MenuActivation::None => UpdateResult::none(),
    }
}

fn handle_column_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(screen) = state.screen.as_mut() else {
        state.ui_mode = UiMode::Normal;
        return UpdateResult::none();
    };
    match screen.columns.handle_key(&key) {
        ColumnKeyOutcome::Handled => UpdateResult::none(),
        ColumnKeyOutcome::Closed => {
            state.ui_mode = UiMode::Normal;
            UpdateResult::none()
        }
        ColumnKeyOutcome::Toggled => {
            let columns = screen.columns.visibility();
            let Some(key) = screen.columns.storage_key.clone() else {
                return UpdateResult::none();
            };
            if let Err(e) = state.prefs.set_column_visibility(&key, &columns) {
                warn!("Failed to persist column selection: {}", e);
            }
            UpdateResult::action(UpdateAction::SyncColumns { key, columns })
        }
    }
}

/// Start loading the current screen's page.
pub(super) fn load_list(state: &mut AppState) -> UpdateResult {
    let Some(screen) = state.screen.as_mut() else {
        return UpdateResult::none();
    };
    let resource = screen.resource();
    let (token, query) = screen.list.begin_load();
    UpdateResult::action(UpdateAction::LoadList {
        resource,
        token,
        query,
    })
}

fn with_list(state: &mut AppState, f: impl FnOnce(&mut crate::list::ListState)) -> UpdateResult {
    if let Some(screen) = state.screen.as_mut() {
        f(&mut screen.list);
    }
    UpdateResult::none()
}
