//! Alert dialog body

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use farmdesk_app::alert::{AlertState, Severity};

use crate::theme::{icons::IconSet, styles};

pub struct AlertModal<'a> {
    alert: &'a AlertState,
    icons: IconSet,
}

impl<'a> AlertModal<'a> {
    pub fn new(alert: &'a AlertState, icons: IconSet) -> Self {
        Self { alert, icons }
    }

    pub fn height(&self, width: u16) -> u16 {
        let width = usize::from(width.max(1));
        let rows: usize = self
            .alert
            .message
            .lines()
            .map(|l| (l.width() + 2).div_ceil(width).max(1))
            .sum();
        (rows.max(1) + 2) as u16
    }
}

impl Widget for AlertModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let (icon, style) = match self.alert.severity {
            Severity::Info => (self.icons.info(), styles::accent()),
            Severity::Error => (self.icons.alert(), styles::status_red()),
        };
        let mut lines: Vec<Line> = Vec::new();
        for (i, text) in self.alert.message.lines().enumerate() {
            let prefix = if i == 0 { icon } else { " " };
            lines.push(Line::from(vec![
                Span::styled(format!("{prefix} "), style),
                Span::styled(text.to_string(), styles::text_primary()),
            ]));
        }

        let body = Rect::new(area.x, area.y, area.width, area.height.saturating_sub(2));
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(body, buf);

        Paragraph::new(Span::styled("[ OK ]", styles::focused_selected()))
            .alignment(Alignment::Center)
            .render(Rect::new(area.x, area.bottom() - 1, area.width, 1), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use farmdesk_app::config::IconMode;

    #[test]
    fn test_error_alert_renders_message_and_ok() {
        let alert = AlertState::error("Server error (500)");
        let mut term = TestTerminal::with_size(40, 3);
        term.render_widget(AlertModal::new(&alert, IconSet::new(IconMode::Ascii)), term.area());

        assert!(term.buffer_contains("! Server error (500)"));
        assert!(term.buffer_contains("[ OK ]"));
    }

    #[test]
    fn test_height_grows_with_wrapped_text() {
        let alert = AlertState::info("Note", "a".repeat(90));
        let modal = AlertModal::new(&alert, IconSet::new(IconMode::Ascii));
        assert_eq!(modal.height(40), 5);
    }
}
