//! Abstract input events, independent of terminal library.
//!
//! Converted from crossterm events at the TUI boundary so the state machine
//! can be driven from tests without a terminal.

/// Abstract input key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKey {
    // Character keys
    /// Regular character key (a-z, 0-9, symbols, space)
    Char(char),
    /// Character with Ctrl modifier (Ctrl+c, ...)
    CharCtrl(char),

    // Navigation
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,

    // Action keys
    Enter,
    Esc,
    Tab,
    /// Shift+Tab
    BackTab,
    Backspace,
    Delete,
}

impl InputKey {
    /// The printable character carried by this key, if any.
    pub fn as_char(&self) -> Option<char> {
        match self {
            InputKey::Char(c) => Some(*c),
            _ => None,
        }
    }
}

/// A left mouse click at a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseClick {
    pub column: u16,
    pub row: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_key_equality() {
        assert_eq!(InputKey::Char('a'), InputKey::Char('a'));
        assert_ne!(InputKey::Char('a'), InputKey::Char('b'));
        assert_ne!(InputKey::CharCtrl('c'), InputKey::Char('c'));
    }

    #[test]
    fn test_as_char() {
        assert_eq!(InputKey::Char(' ').as_char(), Some(' '));
        assert_eq!(InputKey::Enter.as_char(), None);
    }
}
