//! Column visibility popover

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

use farmdesk_app::columns::ColumnState;

use crate::theme::{icons::IconSet, styles};

use super::modal_overlay::{clear_area, render_shadow};

pub struct ColumnSelector<'a> {
    columns: &'a ColumnState,
    icons: IconSet,
}

impl<'a> ColumnSelector<'a> {
    pub fn new(columns: &'a ColumnState, icons: IconSet) -> Self {
        Self { columns, icons }
    }

    /// Popover rect anchored to the top-right corner of `content`.
    pub fn area(&self, content: Rect) -> Rect {
        let label_width = self
            .columns
            .entries()
            .iter()
            .map(|e| e.def.label.width())
            .max()
            .unwrap_or(0) as u16;
        let width = (label_width + self.icons.checked().width() as u16 + 5)
            .max(20)
            .min(content.width);
        let height = (self.columns.entries().len() as u16 + 2).min(content.height);
        Rect::new(
            content.right().saturating_sub(width + 1),
            content.y + 1,
            width,
            height,
        )
    }
}

impl Widget for ColumnSelector<'_> {
    /// `area` is the content region; the popover positions itself inside it.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popover = self.area(area);
        if popover.width < 3 || popover.height < 3 {
            return;
        }
        render_shadow(buf, popover);
        clear_area(buf, popover);

        let block = styles::modal_block("Columns");
        let inner = block.inner(popover);
        block.render(popover, buf);

        let items: Vec<ListItem> = self
            .columns
            .entries()
            .iter()
            .map(|entry| {
                let mark = if entry.visible {
                    self.icons.checked()
                } else {
                    self.icons.unchecked()
                };
                let style = if entry.visible {
                    styles::text_primary()
                } else {
                    styles::text_muted()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, styles::accent()),
                    Span::raw(" "),
                    Span::styled(entry.def.label, style),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(styles::focused_selected());
        let mut state = ListState::default().with_selected(Some(self.columns.focused));
        StatefulWidget::render(list, inner, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use farmdesk_app::config::IconMode;
    use farmdesk_core::Resource;

    #[test]
    fn test_lists_every_column_with_state() {
        let mut columns = ColumnState::new(Resource::Farmers.columns());
        columns.toggle("Village");
        let mut term = TestTerminal::with_size(60, 16);
        term.render_widget(
            ColumnSelector::new(&columns, IconSet::new(IconMode::Ascii)),
            term.area(),
        );

        assert!(term.buffer_contains("[x] Full name"));
        assert!(term.buffer_contains("[ ] Village"));
    }

    #[test]
    fn test_popover_anchored_top_right() {
        let columns = ColumnState::new(Resource::Farmers.columns());
        let selector = ColumnSelector::new(&columns, IconSet::new(IconMode::Ascii));
        let content = Rect::new(28, 3, 72, 20);
        let area = selector.area(content);

        assert_eq!(area.right(), content.right() - 1);
        assert_eq!(area.y, 4);
        assert_eq!(area.height, Resource::Farmers.columns().len() as u16 + 2);
    }
}
