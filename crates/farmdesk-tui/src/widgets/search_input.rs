//! Table filter prompt widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

/// One-line filter prompt: `/query_` while typing, `filter: query` once
/// applied.
pub struct SearchInput<'a> {
    query: &'a str,
    active: bool,
}

impl<'a> SearchInput<'a> {
    pub fn new(query: &'a str, active: bool) -> Self {
        Self { query, active }
    }
}

impl Widget for SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans = if self.active {
            vec![
                Span::styled("/", styles::keybinding()),
                Span::styled(self.query, styles::text_primary()),
                Span::styled("_", styles::keybinding()),
                Span::styled("  Enter apply · Esc cancel", styles::text_muted()),
            ]
        } else {
            vec![
                Span::styled("filter: ", styles::text_muted()),
                Span::styled(self.query, styles::accent()),
            ]
        };
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_active_prompt_shows_cursor() {
        let mut term = TestTerminal::with_size(50, 1);
        term.render_widget(SearchInput::new("kis", true), term.area());
        assert!(term.buffer_contains("/kis_"));
    }

    #[test]
    fn test_applied_filter_label() {
        let mut term = TestTerminal::with_size(50, 1);
        term.render_widget(SearchInput::new("kisumu", false), term.area());
        insta::assert_snapshot!(term.content().trim_end(), @"filter: kisumu");
    }
}
