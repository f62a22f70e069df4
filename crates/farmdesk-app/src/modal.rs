//! Modal dialog primitive
//!
//! A modal locks the screen behind it: keys go to the topmost open modal
//! only, Tab/Shift+Tab cycle inside it, and the focus region that was active
//! when it opened is restored when it closes. A closed modal stays mounted
//! for its exit delay before it is removed.

use std::time::{Duration, Instant};

use crate::alert::AlertState;
use crate::confirm_dialog::ConfirmDialogState;
use crate::form::FormState;
use crate::state::FocusRegion;

/// Horizontal size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalWidth {
    Small,
    #[default]
    Medium,
    Large,
    Wide,
}

impl ModalWidth {
    /// Preferred width in terminal columns.
    pub fn columns(self) -> u16 {
        match self {
            ModalWidth::Small => 44,
            ModalWidth::Medium => 64,
            ModalWidth::Large => 84,
            ModalWidth::Wide => 110,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalOptions {
    pub title: String,
    pub footer: Option<String>,
    pub width: ModalWidth,
    pub close_on_backdrop: bool,
    pub close_on_escape: bool,
}

impl ModalOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            footer: None,
            width: ModalWidth::default(),
            close_on_backdrop: true,
            close_on_escape: true,
        }
    }

    pub fn width(mut self, width: ModalWidth) -> Self {
        self.width = width;
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn close_on_backdrop(mut self, enabled: bool) -> Self {
        self.close_on_backdrop = enabled;
        self
    }

    pub fn close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = enabled;
        self
    }
}

/// Tab order inside a modal; wraps at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusTrap {
    len: usize,
    index: usize,
}

impl FocusTrap {
    /// `len` focusable elements; the first one has focus.
    pub fn new(len: usize) -> Self {
        Self { len, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = self.index.checked_sub(1).unwrap_or(self.len - 1);
        }
    }

    pub fn focus(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }
}

/// Screen cells occupied by a rendered modal, recorded by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalArea {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ModalArea {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && column < self.x.saturating_add(self.width)
            && row >= self.y
            && row < self.y.saturating_add(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Open,
    /// Closed; unmounted once `until` has passed
    Closing { until: Instant },
}

/// What a modal shows.
#[derive(Debug, Clone)]
pub enum ModalKind {
    Form(Box<FormState>),
    Confirm(ConfirmDialogState),
    Alert(AlertState),
}

/// A mounted modal.
#[derive(Debug, Clone)]
pub struct Modal {
    pub options: ModalOptions,
    pub kind: ModalKind,
    pub phase: ModalPhase,
    /// Region focused before the modal opened
    pub restore_focus: FocusRegion,
    /// Where the modal was last drawn, for backdrop hit-testing
    pub area: Option<ModalArea>,
}

impl Modal {
    pub fn new(options: ModalOptions, kind: ModalKind, restore_focus: FocusRegion) -> Self {
        Self {
            options,
            kind,
            phase: ModalPhase::Open,
            restore_focus,
            area: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase == ModalPhase::Open
    }

    /// Whether a click at `(column, row)` landed on the backdrop and should
    /// close this modal.
    pub fn is_backdrop_click(&self, column: u16, row: u16) -> bool {
        self.options.close_on_backdrop
            && self
                .area
                .is_some_and(|area| !area.contains(column, row))
    }
}

/// Mounted modals, bottom first. Only the topmost open one is interactive.
#[derive(Debug, Clone, Default)]
pub struct ModalStack {
    modals: Vec<Modal>,
}

impl ModalStack {
    pub fn push(&mut self, modal: Modal) {
        self.modals.push(modal);
    }

    /// Whether any modal is open; background input is locked while true.
    pub fn has_open(&self) -> bool {
        self.modals.iter().any(Modal::is_open)
    }

    pub fn top(&self) -> Option<&Modal> {
        self.modals.iter().rev().find(|m| m.is_open())
    }

    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.modals.iter_mut().rev().find(|m| m.is_open())
    }

    /// Close the topmost open modal. Returns the focus region to restore.
    pub fn close_top(&mut self, now: Instant, exit_delay: Duration) -> Option<FocusRegion> {
        let modal = self.top_mut()?;
        modal.phase = ModalPhase::Closing {
            until: now + exit_delay,
        };
        Some(modal.restore_focus)
    }

    /// Close the topmost modal without an exit transition and hand back its
    /// content, e.g. to reopen a form underneath a failed confirmation.
    pub fn take_top(&mut self) -> Option<Modal> {
        let index = self.modals.iter().rposition(Modal::is_open)?;
        Some(self.modals.remove(index))
    }

    /// Unmount modals whose exit delay has elapsed. Returns true if any were
    /// removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.modals.len();
        self.modals.retain(|m| match m.phase {
            ModalPhase::Open => true,
            ModalPhase::Closing { until } => now < until,
        });
        self.modals.len() != before
    }

    /// All mounted modals including closing ones, bottom first.
    pub fn iter(&self) -> impl Iterator<Item = &Modal> {
        self.modals.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Modal> {
        self.modals.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.modals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }

    /// The open form modal, if one is mounted (not necessarily on top).
    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        self.modals.iter_mut().rev().find_map(|m| match (&mut m.kind, m.phase) {
            (ModalKind::Form(form), ModalPhase::Open) => Some(form.as_mut()),
            _ => None,
        })
    }

    pub fn form(&self) -> Option<&FormState> {
        self.modals.iter().rev().find_map(|m| match (&m.kind, m.phase) {
            (ModalKind::Form(form), ModalPhase::Open) => Some(form.as_ref()),
            _ => None,
        })
    }
}
