//! Confirmation dialog carrying the operation it guards

use farmdesk_core::{FieldChange, Record, Resource};

use crate::input_key::InputKey;

/// Operation dispatched when the dialog is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingOperation {
    Create {
        resource: Resource,
        record: Record,
    },
    Update {
        resource: Resource,
        id: String,
        record: Record,
    },
    Delete {
        resource: Resource,
        id: String,
    },
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmChoice {
    #[default]
    Confirm,
    Cancel,
}

/// Result of a key press on the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Pending,
    Accepted,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDialogState {
    pub title: String,
    pub message: String,
    /// Field diff listed under the message (saves only)
    pub changes: Vec<FieldChange>,
    pub operation: PendingOperation,
    pub confirm_label: String,
    pub selected: ConfirmChoice,
    /// Destructive actions render the confirm button in the error color
    pub destructive: bool,
}

impl ConfirmDialogState {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        operation: PendingOperation,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            changes: Vec::new(),
            operation,
            confirm_label: "Confirm".to_string(),
            selected: ConfirmChoice::Confirm,
            destructive: false,
        }
    }

    /// Review the changes of a create or update before sending it.
    pub fn save(operation: PendingOperation, changes: Vec<FieldChange>) -> Self {
        let (title, message) = match &operation {
            PendingOperation::Update { resource, .. } => (
                format!("Update {resource}"),
                format!("Apply {} change(s)?", changes.len()),
            ),
            PendingOperation::Create { resource, .. } => (
                format!("Create {resource}"),
                "Create a record with these values?".to_string(),
            ),
            _ => ("Confirm".to_string(), "Continue?".to_string()),
        };
        let mut dialog = Self::new(title, message, operation);
        dialog.changes = changes;
        dialog.confirm_label = "Save".to_string();
        dialog
    }

    /// Delete confirmation; `label` names the record for the user.
    pub fn delete(resource: Resource, id: impl Into<String>, label: &str) -> Self {
        let mut dialog = Self::new(
            format!("Delete from {resource}"),
            format!("Delete \"{label}\"? This cannot be undone from here."),
            PendingOperation::Delete {
                resource,
                id: id.into(),
            },
        );
        dialog.confirm_label = "Delete".to_string();
        dialog.selected = ConfirmChoice::Cancel;
        dialog.destructive = true;
        dialog
    }

    pub fn quit() -> Self {
        let mut dialog = Self::new("Quit Farmdesk", "Are you sure you want to quit?", PendingOperation::Quit);
        dialog.confirm_label = "Quit".to_string();
        dialog
    }

    pub fn toggle_selection(&mut self) {
        self.selected = match self.selected {
            ConfirmChoice::Confirm => ConfirmChoice::Cancel,
            ConfirmChoice::Cancel => ConfirmChoice::Confirm,
        };
    }

    /// Left/Right/Tab move between buttons, Enter activates the selected one,
    /// `y` confirms and `n`/Esc cancels.
    pub fn handle_key(&mut self, key: &InputKey) -> ConfirmOutcome {
        match key {
            InputKey::Left | InputKey::Right | InputKey::Tab | InputKey::BackTab => {
                self.toggle_selection();
                ConfirmOutcome::Pending
            }
            InputKey::Enter => match self.selected {
                ConfirmChoice::Confirm => ConfirmOutcome::Accepted,
                ConfirmChoice::Cancel => ConfirmOutcome::Cancelled,
            },
            InputKey::Char('y') | InputKey::Char('Y') => ConfirmOutcome::Accepted,
            InputKey::Char('n') | InputKey::Char('N') | InputKey::Esc => ConfirmOutcome::Cancelled,
            _ => ConfirmOutcome::Pending,
        }
    }
}
