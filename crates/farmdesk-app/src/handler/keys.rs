//! Key event handlers for different UI modes

use crate::form::FormFocus;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::modal::ModalKind;
use crate::state::{AppState, FocusRegion, UiMode};

/// Convert key events to messages based on current UI mode.
///
/// An open modal takes every key; nothing behind it sees input. Esc only
/// reaches a modal whose options allow closing on escape.
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Force quit from anywhere
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    if let Some(modal) = state.modals.top() {
        let close_on_escape = modal.options.close_on_escape;
        if key == InputKey::Esc && !close_on_escape {
            return None;
        }
        return match &modal.kind {
            ModalKind::Form(form) => handle_key_form(form.focused(), key),
            ModalKind::Confirm(_) => Some(Message::ConfirmKey(key)),
            ModalKind::Alert(_) => handle_key_alert(key),
        };
    }

    match state.ui_mode {
        UiMode::LoginRequired => handle_key_login_required(key),
        UiMode::FilterInput => handle_key_filter_input(key),
        UiMode::MenuSearch => handle_key_menu_search(key),
        UiMode::ColumnSelector => Some(Message::ColumnSelectorKey(key)),
        UiMode::Normal => match state.focus {
            FocusRegion::Sidebar => handle_key_sidebar(key),
            FocusRegion::Table => handle_key_table(state, key),
        },
    }
}

/// Handle key events inside a form modal
fn handle_key_form(focus: FormFocus, key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc => Some(Message::CloseModal),
        InputKey::Tab | InputKey::Down => Some(Message::FormFocusNext),
        InputKey::BackTab | InputKey::Up => Some(Message::FormFocusPrev),
        InputKey::CharCtrl('s') => Some(Message::SubmitForm),
        InputKey::Enter => match focus {
            FormFocus::Submit => Some(Message::SubmitForm),
            FormFocus::Cancel => Some(Message::CloseModal),
            FormFocus::Field(_) => Some(Message::FormFocusNext),
        },
        InputKey::Char(' ') if focus == FormFocus::Submit => Some(Message::SubmitForm),
        InputKey::Char(' ') if focus == FormFocus::Cancel => Some(Message::CloseModal),
        InputKey::Left => Some(Message::FormCycle { forward: false }),
        InputKey::Right => Some(Message::FormCycle { forward: true }),
        InputKey::Backspace => Some(Message::FormBackspace),
        InputKey::Char(c) => Some(Message::FormInput(c)),
        _ => None,
    }
}

fn handle_key_alert(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter | InputKey::Esc | InputKey::Char(' ') => Some(Message::DismissAlert),
        _ => None,
    }
}

fn handle_key_login_required(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('r') | InputKey::Enter => Some(Message::Refresh),
        InputKey::Char('q') | InputKey::Esc => Some(Message::Quit),
        _ => None,
    }
}

/// Handle key events while typing the table filter
fn handle_key_filter_input(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc => Some(Message::CancelFilter),
        InputKey::Enter => Some(Message::SubmitFilter),
        InputKey::Backspace => Some(Message::FilterBackspace),
        InputKey::Char(c) => Some(Message::FilterInput(c)),
        _ => None,
    }
}

/// Handle key events while typing in the sidebar search box
fn handle_key_menu_search(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc => Some(Message::EndMenuSearch { clear: true }),
        InputKey::Enter => Some(Message::EndMenuSearch { clear: false }),
        InputKey::Backspace => Some(Message::MenuSearchBackspace),
        InputKey::Up => Some(Message::MenuUp),
        InputKey::Down => Some(Message::MenuDown),
        InputKey::Char(c) => Some(Message::MenuSearchInput(c)),
        _ => None,
    }
}

/// Handle key events with the sidebar focused
fn handle_key_sidebar(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') => Some(Message::RequestQuit),
        InputKey::Tab | InputKey::BackTab => Some(Message::SwitchFocus),
        InputKey::Up | InputKey::Char('k') => Some(Message::MenuUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::MenuDown),
        InputKey::Enter | InputKey::Char(' ') | InputKey::Right => Some(Message::MenuActivate),
        InputKey::Char('/') => Some(Message::StartMenuSearch),
        _ => None,
    }
}

/// Handle key events with the table focused
fn handle_key_table(state: &AppState, key: InputKey) -> Option<Message> {
    let has_screen = state.screen.is_some();

    match key {
        InputKey::Char('q') => Some(Message::RequestQuit),
        InputKey::Tab | InputKey::BackTab => Some(Message::SwitchFocus),

        // ─────────────────────────────────────────────────────────
        // Rows and pages
        // ─────────────────────────────────────────────────────────
        InputKey::Up | InputKey::Char('k') if has_screen => Some(Message::SelectPrev),
        InputKey::Down | InputKey::Char('j') if has_screen => Some(Message::SelectNext),
        InputKey::Home | InputKey::Char('g') if has_screen => Some(Message::SelectFirst),
        InputKey::End | InputKey::Char('G') if has_screen => Some(Message::SelectLast),
        InputKey::Right | InputKey::PageDown | InputKey::Char(']') if has_screen => {
            Some(Message::NextPage)
        }
        InputKey::Left | InputKey::PageUp | InputKey::Char('[') if has_screen => {
            Some(Message::PrevPage)
        }
        InputKey::Char('s') if has_screen => Some(Message::CyclePageSize),
        InputKey::Char('r') => Some(Message::Refresh),
        InputKey::Char('/') if has_screen => Some(Message::StartFilter),

        // ─────────────────────────────────────────────────────────
        // Records
        // ─────────────────────────────────────────────────────────
        InputKey::Char('n') if has_screen => Some(Message::OpenCreateForm),
        InputKey::Char('e') | InputKey::Enter if has_screen => Some(Message::OpenEditForm),
        InputKey::Char('d') | InputKey::Delete if has_screen => Some(Message::RequestDelete),

        // ─────────────────────────────────────────────────────────
        // Columns and export
        // ─────────────────────────────────────────────────────────
        InputKey::Char('c') if has_screen => Some(Message::OpenColumnSelector),
        InputKey::Char('x') if has_screen => Some(Message::ExportCsv),
        InputKey::Char('t') if has_screen => Some(Message::ExportTemplate),

        _ => None,
    }
}
