//! Status bar widget
//!
//! Shows the latest status message, or key hints for the current mode.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use farmdesk_app::state::{AppState, FocusRegion, UiMode};

use crate::theme::{palette, styles};

pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.state.modals.has_open() {
            return &[("Tab", "next"), ("Enter", "select"), ("Esc", "close")];
        }
        match self.state.ui_mode {
            UiMode::LoginRequired => &[("r", "retry"), ("q", "quit")],
            UiMode::FilterInput => &[("Enter", "apply"), ("Esc", "cancel")],
            UiMode::MenuSearch => &[("↑↓", "move"), ("Enter", "keep"), ("Esc", "clear")],
            UiMode::ColumnSelector => &[("Space", "toggle"), ("Esc", "close")],
            UiMode::Normal => match (self.state.focus, self.state.screen.is_some()) {
                (FocusRegion::Sidebar, _) | (FocusRegion::Table, false) => &[
                    ("↑↓", "move"),
                    ("Enter", "open"),
                    ("/", "search"),
                    ("Tab", "table"),
                    ("q", "quit"),
                ],
                (FocusRegion::Table, true) => &[
                    ("n", "new"),
                    ("e", "edit"),
                    ("d", "delete"),
                    ("/", "filter"),
                    ("[]", "page"),
                    ("s", "size"),
                    ("c", "columns"),
                    ("x", "export"),
                    ("t", "template"),
                    ("q", "quit"),
                ],
            },
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match &self.state.status {
            Some(status) => {
                let style = if status.is_error {
                    styles::status_red()
                } else {
                    styles::status_green()
                };
                Line::from(Span::styled(format!(" {}", status.text), style))
            }
            None => {
                let mut spans = vec![Span::raw(" ")];
                for (key, label) in self.hints() {
                    spans.push(Span::styled(*key, styles::keybinding()));
                    spans.push(Span::styled(format!(" {label}  "), styles::text_muted()));
                }
                Line::from(spans)
            }
        };
        Paragraph::new(line)
            .style(Style::default().bg(palette::DEEPEST_BG))
            .render(area, buf);
    }
}
