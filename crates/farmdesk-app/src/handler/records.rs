//! Record handlers: forms, confirmations, deletes, uniqueness and export

use std::time::Instant;

use farmdesk_core::prelude::*;
use farmdesk_core::{display_field, record_id, Record, Resource};

use crate::alert::AlertState;
use crate::auth::Action;
use crate::confirm_dialog::{ConfirmDialogState, ConfirmOutcome, PendingOperation};
use crate::export;
use crate::form::{FormMode, FormState};
use crate::input_key::InputKey;
use crate::message::RequestFailure;
use crate::modal::{ModalKind, ModalOptions, ModalWidth};
use crate::request::RequestToken;
use crate::state::AppState;

use super::update::load_list;
use super::{UpdateAction, UpdateResult};

const FORM_FOOTER: &str = "Tab next · Enter save · Esc cancel";

fn open_form(state: &mut AppState, form: FormState) {
    let options = ModalOptions::new(form.title())
        .width(ModalWidth::Large)
        .footer(FORM_FOOTER);
    state.open_modal(options, ModalKind::Form(Box::new(form)));
}

pub(super) fn open_create_form(state: &mut AppState) -> UpdateResult {
    let Some(resource) = state.current_resource() else {
        return UpdateResult::none();
    };
    if !state.can(Action::Create, resource) {
        state.set_error_status(format!("You cannot create {resource}"));
        return UpdateResult::none();
    }
    open_form(state, FormState::create(resource));
    UpdateResult::none()
}

pub(super) fn open_edit_form(state: &mut AppState) -> UpdateResult {
    let Some(screen) = state.screen.as_ref() else {
        return UpdateResult::none();
    };
    let resource = screen.resource();
    if !state.can(Action::Edit, resource) {
        state.set_error_status(format!("You cannot edit {resource}"));
        return UpdateResult::none();
    }
    let Some(record) = screen.list.selected_record() else {
        return UpdateResult::none();
    };
    match FormState::edit(resource, record) {
        Some(form) => open_form(state, form),
        None => {
            warn!("Selected {} row has no {}", resource.slug(), resource.id_field());
            state.show_alert(AlertState::error("This record has no id and cannot be edited."));
        }
    }
    UpdateResult::none()
}

pub(super) fn form_input(state: &mut AppState, c: char) -> UpdateResult {
    let debounce = state.settings.behavior.validation_debounce();
    if let Some(form) = state.modals.form_mut() {
        form.input_char(c, Instant::now(), debounce);
    }
    UpdateResult::none()
}

pub(super) fn form_backspace(state: &mut AppState) -> UpdateResult {
    let debounce = state.settings.behavior.validation_debounce();
    if let Some(form) = state.modals.form_mut() {
        form.backspace(Instant::now(), debounce);
    }
    UpdateResult::none()
}

pub(super) fn form_focus(state: &mut AppState, forward: bool) -> UpdateResult {
    if let Some(form) = state.modals.form_mut() {
        if forward {
            form.focus_next();
        } else {
            form.focus_prev();
        }
    }
    UpdateResult::none()
}

pub(super) fn form_cycle(state: &mut AppState, forward: bool) -> UpdateResult {
    let debounce = state.settings.behavior.validation_debounce();
    if let Some(form) = state.modals.form_mut() {
        form.cycle_option(forward, Instant::now(), debounce);
    }
    UpdateResult::none()
}

/// Validate, diff and ask for confirmation. An unchanged form only shows a
/// "No changes" notice.
pub(super) fn submit_form(state: &mut AppState) -> UpdateResult {
    let Some(form) = state.modals.form_mut() else {
        return UpdateResult::none();
    };
    if form.submitting || !form.validate() {
        return UpdateResult::none();
    }

    let changes = form.changes();
    if changes.is_empty() {
        state.show_alert(AlertState::no_changes());
        return UpdateResult::none();
    }

    let resource = form.resource;
    let record = form.payload();
    let operation = match &form.mode {
        FormMode::Create => PendingOperation::Create { resource, record },
        FormMode::Edit { id, .. } => PendingOperation::Update {
            resource,
            id: id.clone(),
            record,
        },
    };
    state.show_confirm(ConfirmDialogState::save(operation, changes));
    UpdateResult::none()
}

pub(super) fn request_delete(state: &mut AppState) -> UpdateResult {
    let Some(screen) = state.screen.as_ref() else {
        return UpdateResult::none();
    };
    let resource = screen.resource();
    if !state.can(Action::Delete, resource) {
        state.set_error_status(format!("You cannot delete from {resource}"));
        return UpdateResult::none();
    }
    let Some(record) = screen.list.selected_record() else {
        return UpdateResult::none();
    };
    let Some(id) = record_id(record, resource.id_field()) else {
        state.show_alert(AlertState::error("This record has no id and cannot be deleted."));
        return UpdateResult::none();
    };
    let label = record_label(resource, record, &id);
    state.show_confirm(ConfirmDialogState::delete(resource, id, &label));
    UpdateResult::none()
}

/// First non-empty column value, else the id.
fn record_label(resource: Resource, record: &Record, id: &str) -> String {
    resource
        .columns()
        .iter()
        .map(|c| display_field(record, c.key))
        .find(|v| !v.is_empty() && v != id)
        .unwrap_or_else(|| id.to_string())
}

pub(super) fn confirm_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let outcome = match state.modals.top_mut().map(|m| &mut m.kind) {
        Some(ModalKind::Confirm(dialog)) => dialog.handle_key(&key),
        _ => return UpdateResult::none(),
    };
    match outcome {
        ConfirmOutcome::Pending => UpdateResult::none(),
        ConfirmOutcome::Cancelled => {
            state.close_modal();
            UpdateResult::none()
        }
        ConfirmOutcome::Accepted => {
            let operation = match state.modals.top().map(|m| &m.kind) {
                Some(ModalKind::Confirm(dialog)) => dialog.operation.clone(),
                _ => return UpdateResult::none(),
            };
            state.close_modal();
            dispatch(state, operation)
        }
    }
}

fn dispatch(state: &mut AppState, operation: PendingOperation) -> UpdateResult {
    match operation {
        PendingOperation::Quit => {
            state.confirm_quit();
            UpdateResult::none()
        }
        PendingOperation::Create { resource, record } => {
            if let Some(form) = state.modals.form_mut() {
                form.submitting = true;
            }
            UpdateResult::action(UpdateAction::CreateRecord { resource, record })
        }
        PendingOperation::Update {
            resource,
            id,
            record,
        } => {
            if let Some(form) = state.modals.form_mut() {
                form.submitting = true;
            }
            UpdateResult::action(UpdateAction::UpdateRecord {
                resource,
                id,
                record,
            })
        }
        PendingOperation::Delete { resource, id } => {
            state.set_status(format!("Deleting from {resource}…"));
            UpdateResult::action(UpdateAction::DeleteRecord {
                resource,
                id,
                deleted_by: state.deleted_by(),
            })
        }
    }
}

pub(super) fn record_saved(
    state: &mut AppState,
    resource: Resource,
    created: bool,
) -> UpdateResult {
    if state
        .modals
        .top()
        .is_some_and(|m| matches!(&m.kind, ModalKind::Form(f) if f.resource == resource))
    {
        state.close_modal();
    }
    info!("{} {}", if created { "Created" } else { "Updated" }, resource.slug());
    state.set_status(if created {
        format!("Created record in {resource}")
    } else {
        format!("Saved changes to {resource}")
    });
    if state.current_resource() == Some(resource) {
        load_list(state)
    } else {
        UpdateResult::none()
    }
}

pub(super) fn save_failed(
    state: &mut AppState,
    resource: Resource,
    failure: RequestFailure,
) -> UpdateResult {
    warn!("Saving {} failed: {}", resource.slug(), failure.detail);
    if let Some(form) = state.modals.form_mut() {
        form.submitting = false;
        if !failure.unauthorized
            && !failure.field_errors.is_empty()
            && form.apply_server_errors(&failure.field_errors)
        {
            state.set_error_status("Fix the highlighted fields");
            return UpdateResult::none();
        }
    }
    state.show_failure(&failure);
    UpdateResult::none()
}

pub(super) fn record_deleted(state: &mut AppState, resource: Resource, id: String) -> UpdateResult {
    info!("Deleted {} {}", resource.slug(), id);
    state.set_status(format!("Deleted record {id} from {resource}"));
    if state.current_resource() == Some(resource) {
        load_list(state)
    } else {
        UpdateResult::none()
    }
}

pub(super) fn delete_failed(
    state: &mut AppState,
    resource: Resource,
    failure: RequestFailure,
) -> UpdateResult {
    warn!("Deleting from {} failed: {}", resource.slug(), failure.detail);
    state.status = None;
    state.show_failure(&failure);
    UpdateResult::none()
}

pub(super) fn unique_checked(
    state: &mut AppState,
    resource: Resource,
    field: &str,
    token: RequestToken,
    result: std::result::Result<bool, RequestFailure>,
) -> UpdateResult {
    let Some(form) = state.modals.form_mut().filter(|f| f.resource == resource) else {
        return UpdateResult::none();
    };
    let applied = match result {
        Ok(available) => form.apply_unique_result(field, token, available),
        Err(failure) => {
            warn!("Uniqueness check for {} failed: {}", field, failure.detail);
            form.apply_unique_failure(field, token)
        }
    };
    if !applied {
        debug!("Dropping stale uniqueness result for {}", field);
    }
    UpdateResult::none()
}

pub(super) fn export_csv(state: &mut AppState) -> UpdateResult {
    let Some(screen) = state.screen.as_ref() else {
        return UpdateResult::none();
    };
    let resource = screen.resource();
    if !state.can(Action::Export, resource) {
        state.set_error_status(format!("You cannot export {resource}"));
        return UpdateResult::none();
    }
    if screen.list.rows.is_empty() {
        state.set_status("Nothing to export");
        return UpdateResult::none();
    }
    let content = export::page_csv(&screen.list.rows, &screen.columns.visible_columns());
    let path = state
        .settings
        .export
        .resolved_directory()
        .join(export::export_file_name(resource, chrono::Local::now()));
    UpdateResult::action(UpdateAction::WriteCsv { path, content })
}

pub(super) fn export_template(state: &mut AppState) -> UpdateResult {
    let Some(resource) = state.current_resource() else {
        return UpdateResult::none();
    };
    let path = state
        .settings
        .export
        .resolved_directory()
        .join(export::template_file_name(resource));
    UpdateResult::action(UpdateAction::WriteCsv {
        path,
        content: export::template_csv(resource),
    })
}
