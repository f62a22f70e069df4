//! Paginated record table for the open resource screen

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use farmdesk_app::list::ListPhase;
use farmdesk_app::state::Screen;
use farmdesk_core::{display_field, ColumnDef};

use crate::theme::{palette, styles};

use super::{truncate, SearchInput};

/// Widest a single column may grow before values are cut
const MAX_COLUMN_WIDTH: usize = 32;

pub struct DataTable<'a> {
    screen: &'a Screen,
    focused: bool,
    /// Filter text being typed, when the prompt is open
    filter_input: Option<&'a str>,
}

impl<'a> DataTable<'a> {
    pub fn new(screen: &'a Screen) -> Self {
        Self {
            screen,
            focused: false,
            filter_input: None,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn filter_input(mut self, input: Option<&'a str>) -> Self {
        self.filter_input = input;
        self
    }

    fn column_widths(&self, columns: &[ColumnDef]) -> Vec<Constraint> {
        let last = columns.len().saturating_sub(1);
        columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                if i == last {
                    return Constraint::Fill(1);
                }
                let widest = self
                    .screen
                    .list
                    .rows
                    .iter()
                    .map(|r| display_field(r, col.key).width())
                    .max()
                    .unwrap_or(0);
                let width = widest.max(col.label.width()).min(MAX_COLUMN_WIDTH);
                Constraint::Length(width as u16)
            })
            .collect()
    }

    fn render_rows(&self, area: Rect, buf: &mut Buffer) {
        let columns = self.screen.columns.visible_columns();
        let widths = self.column_widths(&columns);

        let header = Row::new(
            columns
                .iter()
                .map(|c| Cell::from(Span::styled(c.label, styles::accent_bold()))),
        );

        let rows = self.screen.list.rows.iter().enumerate().map(|(i, record)| {
            let cells = columns.iter().map(|c| {
                Cell::from(truncate(&display_field(record, c.key), MAX_COLUMN_WIDTH))
            });
            let style = if i % 2 == 1 {
                Style::default().bg(palette::ROW_ALT_BG)
            } else {
                Style::default()
            };
            Row::new(cells).style(style)
        });

        let highlight = if self.focused {
            styles::focused_selected()
        } else {
            styles::unfocused_selected()
        };
        let table = Table::new(rows, widths)
            .header(header.bottom_margin(1))
            .column_spacing(2)
            .row_highlight_style(highlight);
        let mut state = TableState::default().with_selected(Some(self.screen.list.selected));
        StatefulWidget::render(table, area, buf, &mut state);
    }

    fn render_placeholder(&self, area: Rect, buf: &mut Buffer, lines: Vec<Line<'static>>) {
        let height = lines.len() as u16;
        let top = area.y + area.height.saturating_sub(height) / 2;
        let centered = Rect::new(area.x, top, area.width, height.min(area.height));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(centered, buf);
    }

    fn pager_line(&self) -> Line<'static> {
        let list = &self.screen.list;
        let page_style = if list.page > 1 || list.page < list.page_count() {
            styles::text_secondary()
        } else {
            styles::text_muted()
        };
        Line::from(vec![
            Span::styled(format!(" {} ", list.range_label()), styles::text_primary()),
            Span::styled("· ", styles::text_muted()),
            Span::styled(
                format!("Page {}/{} ", list.page, list.page_count()),
                page_style,
            ),
            Span::styled("· ", styles::text_muted()),
            Span::styled(format!("{} per page", list.page_size), styles::text_secondary()),
        ])
    }
}

impl Widget for DataTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let list = &self.screen.list;
        let block = styles::glass_block(self.focused)
            .title(format!(" {} ", list.resource))
            .style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 3 || inner.width == 0 {
            return;
        }

        let show_filter = self.filter_input.is_some() || !list.filter.is_empty();
        let [filter_area, table_area, pager_area] = Layout::vertical([
            Constraint::Length(u16::from(show_filter)),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        match self.filter_input {
            Some(input) => SearchInput::new(input, true).render(filter_area, buf),
            None if !list.filter.is_empty() => {
                SearchInput::new(&list.filter, false).render(filter_area, buf)
            }
            None => {}
        }

        match &list.phase {
            ListPhase::Failed(message) => self.render_placeholder(
                table_area,
                buf,
                vec![
                    Line::from(Span::styled(message.clone(), styles::status_red())),
                    Line::from(Span::styled("Press r to retry", styles::text_muted())),
                ],
            ),
            ListPhase::Loading if list.rows.is_empty() => self.render_placeholder(
                table_area,
                buf,
                vec![Line::from(Span::styled("Loading…", styles::text_muted()))],
            ),
            _ if list.rows.is_empty() => {
                let hint = if list.filter.is_empty() {
                    "Press n to add one"
                } else {
                    "Try a different filter"
                };
                self.render_placeholder(
                    table_area,
                    buf,
                    vec![
                        Line::from(Span::styled("No records found", styles::text_secondary())),
                        Line::from(Span::styled(hint, styles::text_muted())),
                    ],
                )
            }
            _ => self.render_rows(table_area, buf),
        }

        Paragraph::new(self.pager_line()).render(pager_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use farmdesk_api::test_utils::test_farmers;
    use farmdesk_app::columns::ColumnState;
    use farmdesk_app::list::ListState;
    use farmdesk_core::{Page, Resource};

    fn screen_with(rows: u64, total: u64) -> Screen {
        let mut list = ListState::new(Resource::Farmers, 10);
        let (token, _) = list.begin_load();
        list.apply_page(
            token,
            Page {
                rows: test_farmers(rows),
                total,
            },
        );
        Screen {
            list,
            columns: ColumnState::new(Resource::Farmers.columns()),
        }
    }

    #[test]
    fn test_renders_headers_rows_and_pager() {
        let screen = screen_with(3, 3);
        let mut term = TestTerminal::with_size(100, 14);
        term.render_widget(DataTable::new(&screen).focused(true), term.area());

        assert!(term.buffer_contains("Farmers"));
        assert!(term.buffer_contains("Code"));
        assert!(term.buffer_contains("Full name"));
        assert!(term.buffer_contains("1-3 of 3"));
        assert!(term.buffer_contains("Page 1/1"));
        assert!(term.buffer_contains("10 per page"));
    }

    #[test]
    fn test_hidden_columns_are_not_rendered() {
        let mut screen = screen_with(2, 2);
        screen.columns.toggle("FullName");
        let mut term = TestTerminal::with_size(100, 10);
        term.render_widget(DataTable::new(&screen), term.area());

        assert!(!term.buffer_contains("Full name"));
        assert!(term.buffer_contains("Code"));
    }

    #[test]
    fn test_empty_state() {
        let screen = screen_with(0, 0);
        let mut term = TestTerminal::with_size(80, 10);
        term.render_widget(DataTable::new(&screen), term.area());

        assert!(term.buffer_contains("No records found"));
        assert!(term.buffer_contains("0 of 0"));
    }

    #[test]
    fn test_loading_state_without_rows() {
        let mut list = ListState::new(Resource::Farmers, 25);
        list.begin_load();
        let screen = Screen {
            list,
            columns: ColumnState::new(Resource::Farmers.columns()),
        };
        let mut term = TestTerminal::with_size(80, 10);
        term.render_widget(DataTable::new(&screen), term.area());

        assert!(term.buffer_contains("Loading…"));
    }

    #[test]
    fn test_failed_state_shows_message_and_retry() {
        let mut list = ListState::new(Resource::Farmers, 25);
        let (token, _) = list.begin_load();
        list.apply_error(token, "Server error (500)");
        let screen = Screen {
            list,
            columns: ColumnState::new(Resource::Farmers.columns()),
        };
        let mut term = TestTerminal::with_size(80, 10);
        term.render_widget(DataTable::new(&screen), term.area());

        assert!(term.buffer_contains("Server error (500)"));
        assert!(term.buffer_contains("Press r to retry"));
    }

    #[test]
    fn test_filter_prompt_while_typing() {
        let screen = screen_with(1, 1);
        let mut term = TestTerminal::with_size(80, 10);
        term.render_widget(
            DataTable::new(&screen).filter_input(Some("nak")),
            term.area(),
        );

        assert!(term.buffer_contains("/nak_"));
    }
}
