//! Confirmation dialog body: message, optional field diff and buttons

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use farmdesk_app::confirm_dialog::{ConfirmChoice, ConfirmDialogState};

use crate::theme::{icons::IconSet, styles};

/// Most diff rows listed before collapsing the rest
const MAX_CHANGE_ROWS: usize = 12;

pub struct ConfirmModal<'a> {
    dialog: &'a ConfirmDialogState,
    icons: IconSet,
}

impl<'a> ConfirmModal<'a> {
    pub fn new(dialog: &'a ConfirmDialogState, icons: IconSet) -> Self {
        Self { dialog, icons }
    }

    /// Rows needed at `width`, accounting for message wrap.
    pub fn height(&self, width: u16) -> u16 {
        let width = usize::from(width.max(1));
        let message_rows = self.dialog.message.width().div_ceil(width).max(1);
        let change_rows = match self.dialog.changes.len() {
            0 => 0,
            n if n > MAX_CHANGE_ROWS => MAX_CHANGE_ROWS + 2,
            n => n + 1,
        };
        // blank + buttons
        (message_rows + change_rows + 2) as u16
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            self.dialog.message.clone(),
            styles::text_primary(),
        ))];

        if !self.dialog.changes.is_empty() {
            lines.push(Line::raw(""));
            for change in self.dialog.changes.iter().take(MAX_CHANGE_ROWS) {
                let old = if change.old_value.is_empty() {
                    "(empty)".to_string()
                } else {
                    change.old_value.clone()
                };
                let new = if change.new_value.is_empty() {
                    "(empty)".to_string()
                } else {
                    change.new_value.clone()
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", change.label), styles::text_secondary()),
                    Span::styled(old, styles::text_muted()),
                    Span::styled(format!(" {} ", self.icons.arrow()), styles::text_muted()),
                    Span::styled(new, styles::accent()),
                ]));
            }
            let hidden = self.dialog.changes.len().saturating_sub(MAX_CHANGE_ROWS);
            if hidden > 0 {
                lines.push(Line::from(Span::styled(
                    format!("…and {hidden} more"),
                    styles::text_muted(),
                )));
            }
        }
        lines
    }

    fn button_line(&self) -> Line<'static> {
        let confirm_style = match (self.dialog.selected, self.dialog.destructive) {
            (ConfirmChoice::Confirm, true) => styles::danger_selected(),
            (ConfirmChoice::Confirm, false) => styles::focused_selected(),
            (ConfirmChoice::Cancel, true) => styles::status_red(),
            (ConfirmChoice::Cancel, false) => styles::text_secondary(),
        };
        let cancel_style = if self.dialog.selected == ConfirmChoice::Cancel {
            styles::focused_selected()
        } else {
            styles::text_secondary()
        };
        Line::from(vec![
            Span::styled(format!("[ {} ]", self.dialog.confirm_label), confirm_style),
            Span::raw("  "),
            Span::styled("[ Cancel ]", cancel_style),
        ])
    }
}

impl Widget for ConfirmModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let buttons_y = area.bottom() - 1;
        let body = Rect::new(area.x, area.y, area.width, area.height.saturating_sub(2));
        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .render(body, buf);

        Paragraph::new(self.button_line())
            .alignment(Alignment::Center)
            .render(Rect::new(area.x, buttons_y, area.width, 1), buf);
    }
}
