//! Terminal event polling

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use farmdesk_app::message::Message;
use farmdesk_app::{InputKey, MouseClick};
use farmdesk_core::prelude::*;

/// Convert crossterm KeyEvent to InputKey
pub fn key_event_to_input(key: crossterm::event::KeyEvent) -> Option<InputKey> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputKey::CharCtrl(c))
        }
        KeyCode::Char(c) => Some(InputKey::Char(c)),
        KeyCode::Enter => Some(InputKey::Enter),
        KeyCode::Esc => Some(InputKey::Esc),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(InputKey::BackTab),
        KeyCode::Tab => Some(InputKey::Tab),
        KeyCode::BackTab => Some(InputKey::BackTab),
        KeyCode::Backspace => Some(InputKey::Backspace),
        KeyCode::Delete => Some(InputKey::Delete),
        KeyCode::Up => Some(InputKey::Up),
        KeyCode::Down => Some(InputKey::Down),
        KeyCode::Left => Some(InputKey::Left),
        KeyCode::Right => Some(InputKey::Right),
        KeyCode::Home => Some(InputKey::Home),
        KeyCode::End => Some(InputKey::End),
        KeyCode::PageUp => Some(InputKey::PageUp),
        KeyCode::PageDown => Some(InputKey::PageDown),
        _ => None,
    }
}

/// Left-button presses become clicks; everything else is ignored.
pub fn mouse_event_to_click(mouse: crossterm::event::MouseEvent) -> Option<MouseClick> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(MouseClick {
            column: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}

/// Poll for terminal events with timeout
pub fn poll() -> Result<Option<Message>> {
    // 50ms timeout keeps the spinner and debounce timers moving
    if event::poll(Duration::from_millis(50))? {
        let message = match event::read()? {
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                key_event_to_input(key).map(Message::Key)
            }
            Event::Mouse(mouse) => mouse_event_to_click(mouse).map(Message::MouseClick),
            _ => None,
        };
        Ok(message)
    } else {
        Ok(Some(Message::Tick))
    }
}
