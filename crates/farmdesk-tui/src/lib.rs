//! farmdesk-tui - Terminal UI for Farmdesk
//!
//! ratatui-based rendering of [`farmdesk_app::AppState`] plus the event loop
//! that feeds crossterm input and backend results through the update function.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry points
pub use runner::run;
