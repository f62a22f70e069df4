//! Create/edit form state
//!
//! A form is built from a resource's [`FieldSpec`]s. Focus cycles over the
//! fields followed by the Save and Cancel buttons. Fields flagged for
//! uniqueness schedule a server check after each edit; only the latest
//! check's result is applied.

use std::time::{Duration, Instant};

use farmdesk_core::{
    compute_changes, display_field, parse_input, record_id, validate_value, FieldChange,
    FieldErrors, FieldKind, FieldSpec, Record, Resource, UpdateVerb,
};

use crate::modal::FocusTrap;
use crate::request::{RequestSequence, RequestToken};

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit { id: String, original: Record },
}

/// Server-side uniqueness status of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Uniqueness {
    #[default]
    Unchecked,
    /// Edited; a check is scheduled
    Pending,
    Checking,
    Available,
    Taken,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: FieldSpec,
    pub value: String,
    pub error: Option<String>,
    pub uniqueness: Uniqueness,
    check_due: Option<Instant>,
    checks: RequestSequence,
}

impl FormField {
    fn new(spec: FieldSpec, value: String) -> Self {
        Self {
            spec,
            value,
            error: None,
            uniqueness: Uniqueness::Unchecked,
            check_due: None,
            checks: RequestSequence::new(),
        }
    }
}

/// What currently has focus inside the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(usize),
    Submit,
    Cancel,
}

/// A uniqueness check ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueCheck {
    pub field: String,
    pub value: String,
    pub token: RequestToken,
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub resource: Resource,
    pub mode: FormMode,
    pub fields: Vec<FormField>,
    pub focus: FocusTrap,
    /// Set while the confirmed save is in flight
    pub submitting: bool,
}

fn initial_value(spec: &FieldSpec, record: Option<&Record>) -> String {
    match (record, spec.kind) {
        (Some(record), _) => display_field(record, spec.key),
        (None, FieldKind::Bool) => "false".to_string(),
        (None, FieldKind::Select(options)) if spec.required => {
            options.first().map(|o| o.to_string()).unwrap_or_default()
        }
        (None, _) => String::new(),
    }
}

impl FormState {
    /// Empty form for a new record.
    pub fn create(resource: Resource) -> Self {
        Self::build(resource, FormMode::Create)
    }

    /// Form pre-filled from `record`. `None` when the record has no id.
    pub fn edit(resource: Resource, record: &Record) -> Option<Self> {
        let id = record_id(record, resource.id_field())?;
        Some(Self::build(
            resource,
            FormMode::Edit {
                id,
                original: record.clone(),
            },
        ))
    }

    fn build(resource: Resource, mode: FormMode) -> Self {
        let original = match &mode {
            FormMode::Edit { original, .. } => Some(original),
            FormMode::Create => None,
        };
        let fields: Vec<FormField> = resource
            .fields()
            .iter()
            .map(|spec| FormField::new(*spec, initial_value(spec, original)))
            .collect();
        let focus = FocusTrap::new(fields.len() + 2);
        Self {
            resource,
            mode,
            fields,
            focus,
            submitting: false,
        }
    }

    pub fn title(&self) -> String {
        match self.mode {
            FormMode::Create => format!("New {}", self.resource),
            FormMode::Edit { .. } => format!("Edit {}", self.resource),
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    /// Id of the record being edited, excluded from uniqueness checks.
    pub fn record_id(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Edit { id, .. } => Some(id),
            FormMode::Create => None,
        }
    }

    pub fn focused(&self) -> FormFocus {
        let index = self.focus.index();
        match index.checked_sub(self.fields.len()) {
            None => FormFocus::Field(index),
            Some(0) => FormFocus::Submit,
            Some(_) => FormFocus::Cancel,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus.prev();
    }

    fn focused_field_mut(&mut self) -> Option<&mut FormField> {
        match self.focused() {
            FormFocus::Field(i) => self.fields.get_mut(i),
            _ => None,
        }
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.spec.key == key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.field(key).map(|f| f.value.as_str())
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.error.is_some())
    }

    // ─────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────

    /// Type a character into the focused field. Space toggles booleans and
    /// cycles select options. Returns true when a value changed.
    pub fn input_char(&mut self, c: char, now: Instant, debounce: Duration) -> bool {
        let Some(field) = self.focused_field_mut() else {
            return false;
        };
        match field.spec.kind {
            FieldKind::Bool | FieldKind::Select(_) if c == ' ' => {}
            FieldKind::Bool | FieldKind::Select(_) => return false,
            _ => {
                field.value.push(c);
                self.after_edit(now, debounce);
                return true;
            }
        }
        self.cycle_option(true, now, debounce)
    }

    pub fn backspace(&mut self, now: Instant, debounce: Duration) -> bool {
        let Some(field) = self.focused_field_mut() else {
            return false;
        };
        if matches!(field.spec.kind, FieldKind::Bool | FieldKind::Select(_)) {
            return false;
        }
        if field.value.pop().is_none() {
            return false;
        }
        self.after_edit(now, debounce);
        true
    }

    /// Step a bool or select field forward/backward.
    pub fn cycle_option(&mut self, forward: bool, now: Instant, debounce: Duration) -> bool {
        let Some(field) = self.focused_field_mut() else {
            return false;
        };
        let next = match field.spec.kind {
            FieldKind::Bool => {
                let on = matches!(field.value.as_str(), "true" | "1" | "yes");
                (!on).to_string()
            }
            FieldKind::Select(options) if !options.is_empty() => {
                let len = options.len();
                let next = match options.iter().position(|o| *o == field.value) {
                    Some(i) if forward => (i + 1) % len,
                    Some(i) => i.checked_sub(1).unwrap_or(len - 1),
                    None => 0,
                };
                options[next].to_string()
            }
            _ => return false,
        };
        field.value = next;
        self.after_edit(now, debounce);
        true
    }

    fn after_edit(&mut self, now: Instant, debounce: Duration) {
        let FormFocus::Field(index) = self.focused() else {
            return;
        };
        let original = match (&self.mode, self.fields.get(index)) {
            (FormMode::Edit { original, .. }, Some(field)) => {
                Some(display_field(original, field.spec.key))
            }
            _ => None,
        };
        let Some(field) = self.fields.get_mut(index) else {
            return;
        };
        field.error = None;
        if !field.spec.unique_check {
            return;
        }
        // Drop whatever was in flight for the previous value
        field.checks.cancel();
        let value = field.value.trim();
        if value.is_empty() || original.as_deref() == Some(value) {
            field.uniqueness = Uniqueness::Unchecked;
            field.check_due = None;
        } else {
            field.uniqueness = Uniqueness::Pending;
            field.check_due = Some(now + debounce);
        }
    }

    // ─────────────────────────────────────────────────────────
    // Uniqueness checks
    // ─────────────────────────────────────────────────────────

    /// Earliest scheduled check, for the event loop's timer.
    pub fn next_check_due(&self) -> Option<Instant> {
        self.fields.iter().filter_map(|f| f.check_due).min()
    }

    /// Issue every check whose debounce has elapsed. Values that fail
    /// client-side validation are not sent.
    pub fn take_due_checks(&mut self, now: Instant) -> Vec<UniqueCheck> {
        let mut out = Vec::new();
        for field in &mut self.fields {
            let Some(due) = field.check_due else {
                continue;
            };
            if due > now {
                continue;
            }
            field.check_due = None;
            if let Some(error) = validate_value(&field.spec, &field.value) {
                field.error = Some(error);
                field.uniqueness = Uniqueness::Unchecked;
                continue;
            }
            field.uniqueness = Uniqueness::Checking;
            out.push(UniqueCheck {
                field: field.spec.key.to_string(),
                value: field.value.trim().to_string(),
                token: field.checks.issue(),
            });
        }
        out
    }

    /// Apply a uniqueness result. Returns false when it was stale.
    pub fn apply_unique_result(&mut self, key: &str, token: RequestToken, available: bool) -> bool {
        let Some(field) = self.fields.iter_mut().find(|f| f.spec.key == key) else {
            return false;
        };
        if !field.checks.complete(token) {
            return false;
        }
        if available {
            field.uniqueness = Uniqueness::Available;
            if field.error.as_deref().is_some_and(|e| e.ends_with("is already in use")) {
                field.error = None;
            }
        } else {
            field.uniqueness = Uniqueness::Taken;
            field.error = Some(format!("{} is already in use", field.spec.label));
        }
        true
    }

    /// A failed check leaves the field unchecked; the server decides on save.
    pub fn apply_unique_failure(&mut self, key: &str, token: RequestToken) -> bool {
        let Some(field) = self.fields.iter_mut().find(|f| f.spec.key == key) else {
            return false;
        };
        if !field.checks.complete(token) {
            return false;
        }
        field.uniqueness = Uniqueness::Unchecked;
        true
    }

    // ─────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────

    /// Run client-side validation, setting inline errors. Fields known to be
    /// taken stay in error. Returns true when the form can be submitted.
    pub fn validate(&mut self) -> bool {
        for field in &mut self.fields {
            field.error = validate_value(&field.spec, &field.value).or_else(|| {
                (field.uniqueness == Uniqueness::Taken)
                    .then(|| format!("{} is already in use", field.spec.label))
            });
        }
        if let Some(first) = self.fields.iter().position(|f| f.error.is_some()) {
            self.focus.focus(first);
            return false;
        }
        true
    }

    /// The original record overlaid with the parsed form values.
    pub fn pending_record(&self) -> Record {
        let mut record = match &self.mode {
            FormMode::Edit { original, .. } => original.clone(),
            FormMode::Create => Record::new(),
        };
        for field in &self.fields {
            record.insert(
                field.spec.key.to_string(),
                parse_input(&field.spec, &field.value),
            );
        }
        record
    }

    /// Field-level changes between the original record and the form.
    pub fn changes(&self) -> Vec<FieldChange> {
        let empty = Record::new();
        let original = match &self.mode {
            FormMode::Edit { original, .. } => original,
            FormMode::Create => &empty,
        };
        let resource = self.resource;
        compute_changes(original, &self.pending_record(), |key| {
            resource.label_for(key).map(str::to_string)
        })
    }

    /// Body sent to the backend: non-empty fields on create, changed fields
    /// for PATCH updates and the whole record for PUT updates.
    pub fn payload(&self) -> Record {
        let pending = self.pending_record();
        match &self.mode {
            FormMode::Create => pending.into_iter().filter(|(_, v)| !v.is_null()).collect(),
            FormMode::Edit { .. } if self.resource.update_verb() == UpdateVerb::Put => pending,
            FormMode::Edit { .. } => {
                let changed: Vec<String> = self.changes().into_iter().map(|c| c.key).collect();
                pending
                    .into_iter()
                    .filter(|(k, _)| changed.contains(k))
                    .collect()
            }
        }
    }

    /// Show server-reported field errors inline. Returns true if at least one
    /// matched a field on this form.
    pub fn apply_server_errors(&mut self, errors: &FieldErrors) -> bool {
        let mut matched = false;
        for (key, message) in errors {
            if let Some(field) = self
                .fields
                .iter_mut()
                .find(|f| f.spec.key.eq_ignore_ascii_case(key))
            {
                field.error = Some(message.clone());
                matched = true;
            }
        }
        if let Some(first) = self.fields.iter().position(|f| f.error.is_some()) {
            self.focus.focus(first);
        }
        matched
    }
}
