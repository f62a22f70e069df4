//! Create/edit form body
//!
//! One row per field (`Label *  value  mark`) with its error underneath,
//! followed by the Save and Cancel buttons. The body scrolls to keep the
//! focused field visible.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use farmdesk_app::form::{FormField, FormFocus, FormState, Uniqueness};
use farmdesk_core::FieldKind;

use crate::theme::{icons::IconSet, palette, styles};

use super::truncate;

pub struct FormModal<'a> {
    form: &'a FormState,
    icons: IconSet,
}

impl<'a> FormModal<'a> {
    pub fn new(form: &'a FormState, icons: IconSet) -> Self {
        Self { form, icons }
    }

    /// Rows needed to show the whole form.
    pub fn height(&self) -> u16 {
        let field_rows: usize = self
            .form
            .fields
            .iter()
            .map(|f| 1 + usize::from(f.error.is_some()))
            .sum();
        // blank line + buttons
        (field_rows + 2) as u16
    }

    fn label_width(&self) -> usize {
        self.form
            .fields
            .iter()
            .map(|f| f.spec.label.width() + 2)
            .max()
            .unwrap_or(0)
    }

    fn value_text(&self, field: &FormField, focused: bool) -> String {
        match field.spec.kind {
            FieldKind::Bool => {
                let on = matches!(field.value.as_str(), "true" | "1" | "yes");
                if on {
                    format!("{} yes", self.icons.checked())
                } else {
                    format!("{} no", self.icons.unchecked())
                }
            }
            FieldKind::Select(_) => format!("‹ {} ›", field.value),
            _ if focused => format!("{}_", field.value),
            _ => field.value.clone(),
        }
    }

    fn mark(&self, field: &FormField) -> Span<'static> {
        match field.uniqueness {
            Uniqueness::Unchecked => Span::raw(""),
            Uniqueness::Pending | Uniqueness::Checking => {
                Span::styled("checking…", styles::text_muted())
            }
            Uniqueness::Available => Span::styled(self.icons.ok(), styles::status_green()),
            Uniqueness::Taken => Span::styled(self.icons.taken(), styles::status_red()),
        }
    }

    fn field_lines(&self, width: usize) -> (Vec<Line<'static>>, Option<usize>) {
        let label_width = self.label_width();
        let value_width = width.saturating_sub(label_width + 12).max(8);
        let focus = self.form.focused();
        let mut lines = Vec::new();
        let mut focused_line = None;

        for (i, field) in self.form.fields.iter().enumerate() {
            let focused = focus == FormFocus::Field(i);
            if focused {
                focused_line = Some(lines.len());
            }
            let label = if field.spec.required {
                format!("{} *", field.spec.label)
            } else {
                field.spec.label.to_string()
            };
            let label_style = if field.error.is_some() {
                styles::status_red()
            } else if focused {
                styles::accent_bold()
            } else {
                styles::text_secondary()
            };
            let input_bg = if focused {
                palette::INPUT_ACTIVE_BG
            } else {
                palette::INPUT_BG
            };
            let value = truncate(&self.value_text(field, focused), value_width);
            let padded = format!(" {:<w$}", value, w = value_width.saturating_sub(1));

            lines.push(Line::from(vec![
                Span::styled(format!("{:<w$}", label, w = label_width), label_style),
                Span::styled(padded, Style::default().fg(palette::TEXT_PRIMARY).bg(input_bg)),
                Span::raw(" "),
                self.mark(field),
            ]));
            if let Some(error) = &field.error {
                lines.push(Line::from(vec![
                    Span::raw(" ".repeat(label_width)),
                    Span::styled(format!("{} {}", self.icons.alert(), error), styles::status_red()),
                ]));
            }
        }
        (lines, focused_line)
    }

    fn button_line(&self) -> Line<'static> {
        let focus = self.form.focused();
        let button = |label: &str, active: bool| {
            let style = if active {
                styles::focused_selected()
            } else {
                styles::text_secondary()
            };
            Span::styled(format!("[ {label} ]"), style)
        };
        let save_label = if self.form.submitting {
            "Saving…"
        } else {
            "Save"
        };
        Line::from(vec![
            button(save_label, focus == FormFocus::Submit),
            Span::raw("  "),
            button("Cancel", focus == FormFocus::Cancel),
        ])
    }
}

impl Widget for FormModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let (mut lines, focused_line) = self.field_lines(area.width as usize);
        lines.push(Line::raw(""));
        lines.push(self.button_line());

        let visible = area.height as usize;
        let target = match self.form.focused() {
            FormFocus::Field(_) => focused_line.unwrap_or(0) + 1,
            FormFocus::Submit | FormFocus::Cancel => lines.len(),
        };
        let scroll = target.saturating_sub(visible);

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(area, buf);
    }
}
