//! Column visibility state for the data table
//!
//! At least one column is visible at all times. The popover that edits the
//! mapping is keyboard driven: Up/Down (wrapping), Home/End, Space/Enter to
//! toggle and Esc to close.

use farmdesk_core::ColumnDef;

use crate::input_key::InputKey;
use crate::preferences::ColumnVisibility;

/// One column and whether it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnEntry {
    pub def: ColumnDef,
    pub visible: bool,
}

/// Result of a key press while the popover is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKeyOutcome {
    /// Focus moved or the key was ignored
    Handled,
    /// Visibility changed; persist it
    Toggled,
    /// Popover closed
    Closed,
}

#[derive(Debug, Clone)]
pub struct ColumnState {
    entries: Vec<ColumnEntry>,
    /// Preference key the mapping is stored under, if persisted
    pub storage_key: Option<String>,
    pub popover_open: bool,
    pub focused: usize,
}

impl ColumnState {
    /// All columns visible.
    pub fn new(columns: &[ColumnDef]) -> Self {
        Self {
            entries: columns
                .iter()
                .map(|def| ColumnEntry {
                    def: *def,
                    visible: true,
                })
                .collect(),
            storage_key: None,
            popover_open: false,
            focused: 0,
        }
    }

    /// Start from a stored mapping.
    ///
    /// Unknown stored keys are dropped and columns absent from the mapping
    /// default to visible. A mapping that would hide everything is ignored.
    pub fn with_stored(columns: &[ColumnDef], stored: Option<&ColumnVisibility>) -> Self {
        let mut state = Self::new(columns);
        if let Some(stored) = stored.filter(|s| !s.is_empty()) {
            for entry in &mut state.entries {
                if let Some(visible) = stored.get(entry.def.key) {
                    entry.visible = *visible;
                }
            }
            if state.visible_count() == 0 {
                for entry in &mut state.entries {
                    entry.visible = true;
                }
            }
        }
        state
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    pub fn entries(&self) -> &[ColumnEntry] {
        &self.entries
    }

    pub fn visible_count(&self) -> usize {
        self.entries.iter().filter(|e| e.visible).count()
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.def.key == key && e.visible)
    }

    /// Visible columns in display order.
    pub fn visible_columns(&self) -> Vec<ColumnDef> {
        self.entries
            .iter()
            .filter(|e| e.visible)
            .map(|e| e.def)
            .collect()
    }

    /// Full mapping as persisted.
    pub fn visibility(&self) -> ColumnVisibility {
        self.entries
            .iter()
            .map(|e| (e.def.key.to_string(), e.visible))
            .collect()
    }

    /// Flip `key`. Returns false (no change) for unknown keys and for the
    /// last visible column.
    pub fn toggle(&mut self, key: &str) -> bool {
        let visible_count = self.visible_count();
        let Some(entry) = self.entries.iter_mut().find(|e| e.def.key == key) else {
            return false;
        };
        if entry.visible && visible_count == 1 {
            return false;
        }
        entry.visible = !entry.visible;
        true
    }

    // ─────────────────────────────────────────────────────────
    // Popover
    // ─────────────────────────────────────────────────────────

    pub fn open_popover(&mut self) {
        self.popover_open = true;
        self.focused = 0;
    }

    pub fn close_popover(&mut self) {
        self.popover_open = false;
    }

    pub fn focus_next(&mut self) {
        if !self.entries.is_empty() {
            self.focused = (self.focused + 1) % self.entries.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.entries.is_empty() {
            self.focused = self
                .focused
                .checked_sub(1)
                .unwrap_or(self.entries.len() - 1);
        }
    }

    pub fn toggle_focused(&mut self) -> bool {
        match self.entries.get(self.focused) {
            Some(entry) => {
                let key = entry.def.key;
                self.toggle(key)
            }
            None => false,
        }
    }

    pub fn handle_key(&mut self, key: &InputKey) -> ColumnKeyOutcome {
        match key {
            InputKey::Up | InputKey::BackTab => self.focus_prev(),
            InputKey::Down | InputKey::Tab => self.focus_next(),
            InputKey::Home => self.focused = 0,
            InputKey::End => self.focused = self.entries.len().saturating_sub(1),
            InputKey::Char(' ') | InputKey::Enter => {
                if self.toggle_focused() {
                    return ColumnKeyOutcome::Toggled;
                }
            }
            InputKey::Esc | InputKey::Char('c') => {
                self.close_popover();
                return ColumnKeyOutcome::Closed;
            }
            _ => {}
        }
        ColumnKeyOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmdesk_core::Resource;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("FullName", "Full name"),
        ColumnDef::new("Phone", "Phone"),
        ColumnDef::new("Village", "Village"),
    ];

    #[test]
    fn test_all_visible_by_default() {
        let state = ColumnState::new(COLUMNS);
        assert_eq!(state.visible_count(), 3);
    }

    #[test]
    fn test_toggle_hides_and_shows() {
        let mut state = ColumnState::new(COLUMNS);
        assert!(state.toggle("Phone"));
        assert!(!state.is_visible("Phone"));
        assert!(state.toggle("Phone"));
        assert!(state.is_visible("Phone"));
    }

    #[test]
    fn test_last_visible_column_cannot_be_hidden() {
        let mut state = ColumnState::new(COLUMNS);
        assert!(state.toggle("FullName"));
        assert!(state.toggle("Phone"));
        assert!(!state.toggle("Village"));
        assert_eq!(state.visible_count(), 1);
        assert!(state.is_visible("Village"));
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let mut state = ColumnState::new(COLUMNS);
        assert!(!state.toggle("Nope"));
        assert_eq!(state.visible_count(), 3);
    }

    #[test]
    fn test_never_empty_under_any_sequence() {
        let keys = ["FullName", "Phone", "Village"];
        let mut state = ColumnState::new(COLUMNS);
        // Deterministic pseudo-random walk over toggles
        let mut seed: u32 = 7;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            state.toggle(keys[(seed >> 16) as usize % keys.len()]);
            assert!(state.visible_count() >= 1);
        }
    }

    #[test]
    fn test_with_stored_mapping() {
        let mut stored = ColumnVisibility::new();
        stored.insert("Phone".into(), false);
        stored.insert("Removed".into(), false);
        let state = ColumnState::with_stored(COLUMNS, Some(&stored));

        assert!(!state.is_visible("Phone"));
        assert!(state.is_visible("Village"));
        assert_eq!(state.visibility().len(), 3);
    }

    #[test]
    fn test_all_hidden_stored_mapping_falls_back() {
        let stored: ColumnVisibility = COLUMNS
            .iter()
            .map(|c| (c.key.to_string(), false))
            .collect();
        let state = ColumnState::with_stored(COLUMNS, Some(&stored));
        assert_eq!(state.visible_count(), 3);
    }

    #[test]
    fn test_popover_keyboard() {
        let mut state = ColumnState::new(COLUMNS);
        state.open_popover();

        assert_eq!(state.handle_key(&InputKey::Up), ColumnKeyOutcome::Handled);
        assert_eq!(state.focused, 2);
        state.handle_key(&InputKey::Down);
        assert_eq!(state.focused, 0);
        state.handle_key(&InputKey::End);
        assert_eq!(state.focused, 2);

        assert_eq!(
            state.handle_key(&InputKey::Char(' ')),
            ColumnKeyOutcome::Toggled
        );
        assert!(!state.is_visible("Village"));

        state.handle_key(&InputKey::Home);
        assert_eq!(state.handle_key(&InputKey::Enter), ColumnKeyOutcome::Toggled);
        assert!(!state.is_visible("FullName"));

        // Phone is now the only visible column
        state.handle_key(&InputKey::Down);
        assert_eq!(state.handle_key(&InputKey::Enter), ColumnKeyOutcome::Handled);

        assert_eq!(state.handle_key(&InputKey::Esc), ColumnKeyOutcome::Closed);
        assert!(!state.popover_open);
    }

    #[test]
    fn test_visible_columns_keep_order() {
        let mut state = ColumnState::new(Resource::Farmers.columns());
        let first = Resource::Farmers.columns()[0].key;
        state.toggle(first);
        let visible = state.visible_columns();
        assert_eq!(visible.len(), Resource::Farmers.columns().len() - 1);
        assert_eq!(visible[0], Resource::Farmers.columns()[1]);
    }
}
