//! Screen layout definitions for the TUI
//!
//! Top nav across the full width, sidebar on the left, content on the right
//! and a one-line status bar at the bottom.

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the sidebar on regular terminals
pub const SIDEBAR_WIDTH: u16 = 28;

/// Below this width the sidebar shrinks to make room for the table
const NARROW_WIDTH: u16 = 80;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    pub top_nav: Rect,
    pub sidebar: Rect,
    pub content: Rect,
    pub status: Rect,
}

pub fn create(area: Rect) -> ScreenAreas {
    let [top_nav, body, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let sidebar_width = if area.width < NARROW_WIDTH {
        (area.width / 3).min(SIDEBAR_WIDTH)
    } else {
        SIDEBAR_WIDTH
    };
    let [sidebar, content] =
        Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Min(10)]).areas(body);

    ScreenAreas {
        top_nav,
        sidebar,
        content,
        status,
    }
}
