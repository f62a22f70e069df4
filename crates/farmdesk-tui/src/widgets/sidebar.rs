//! Sidebar navigation: search box over the permission-filtered menu tree

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use farmdesk_app::auth::Claims;
use farmdesk_app::menu::{MenuRow, MenuState};
use farmdesk_core::Resource;

use crate::theme::{icons::IconSet, palette, styles};

use super::truncate;

pub struct Sidebar<'a> {
    menu: &'a MenuState,
    claims: &'a Claims,
    focused: bool,
    current: Option<Resource>,
    icons: IconSet,
}

impl<'a> Sidebar<'a> {
    pub fn new(menu: &'a MenuState, claims: &'a Claims, icons: IconSet) -> Self {
        Self {
            menu,
            claims,
            focused: false,
            current: None,
            icons,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Highlight the entry of the open screen.
    pub fn current(mut self, resource: Option<Resource>) -> Self {
        self.current = resource;
        self
    }

    fn search_line(&self) -> Line<'static> {
        if self.menu.searching || !self.menu.query.is_empty() {
            let mut spans = vec![
                Span::styled("/ ", styles::keybinding()),
                Span::styled(self.menu.query.clone(), styles::text_primary()),
            ];
            if self.menu.searching {
                spans.push(Span::styled("_", styles::keybinding()));
            }
            Line::from(spans)
        } else {
            Line::from(Span::styled("/ search menu", styles::text_muted()))
        }
    }

    fn row_item(&self, row: &MenuRow, width: usize) -> ListItem<'static> {
        let indent = "  ".repeat(row.depth);
        let marker = if row.has_children {
            if row.expanded {
                self.icons.expanded()
            } else {
                self.icons.collapsed()
            }
        } else {
            " "
        };
        let label = truncate(row.label, width.saturating_sub(indent.len() + 3));
        let style = if row.resource.is_some() && row.resource == self.current {
            styles::accent_bold()
        } else if row.has_children {
            styles::text_secondary()
        } else {
            styles::text_primary()
        };
        ListItem::new(Line::from(vec![
            Span::raw(indent),
            Span::styled(marker, styles::text_muted()),
            Span::raw(" "),
            Span::styled(label, style),
        ]))
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused)
            .title(" Menu ")
            .style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 2 || inner.width == 0 {
            return;
        }

        let [search_area, _, list_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);
        Paragraph::new(self.search_line()).render(search_area, buf);

        let rows = self.menu.rows(self.claims);
        if rows.is_empty() {
            let text = if self.menu.query.trim().is_empty() {
                "Nothing available"
            } else {
                "No matches"
            };
            Paragraph::new(Span::styled(text, styles::text_muted())).render(list_area, buf);
            return;
        }

        let width = list_area.width as usize;
        let items: Vec<ListItem> = rows.iter().map(|r| self.row_item(r, width)).collect();
        let highlight = if self.focused {
            styles::focused_selected()
        } else {
            styles::unfocused_selected()
        };
        let list = List::new(items).highlight_style(highlight);
        let mut state = ListState::default().with_selected(Some(self.menu.selected.min(rows.len() - 1)));
        StatefulWidget::render(list, list_area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use farmdesk_app::config::IconMode;

    fn admin() -> Claims {
        Claims::new("admin", &["ROLE_ADMIN".to_string()], &[])
    }

    #[test]
    fn test_sidebar_lists_groups_for_admin() {
        let menu = MenuState::default();
        let claims = admin();
        let mut term = TestTerminal::with_size(28, 20);
        term.render_widget(
            Sidebar::new(&menu, &claims, IconSet::new(IconMode::Ascii)),
            term.area(),
        );

        assert!(term.buffer_contains("People"));
        assert!(term.buffer_contains("Access Control"));
        assert!(term.buffer_contains("/ search menu"));
    }

    #[test]
    fn test_sidebar_hides_restricted_groups() {
        let menu = MenuState::default();
        let claims = Claims::new("clerk", &[], &["FARMERS_VIEW".to_string()]);
        let mut term = TestTerminal::with_size(28, 20);
        term.render_widget(
            Sidebar::new(&menu, &claims, IconSet::new(IconMode::Ascii)),
            term.area(),
        );

        assert!(term.buffer_contains("People"));
        assert!(!term.buffer_contains("Access Control"));
    }

    #[test]
    fn test_sidebar_search_expands_matches() {
        let mut menu = MenuState::default();
        let claims = admin();
        menu.searching = true;
        menu.query = "lookup".to_string();
        let mut term = TestTerminal::with_size(28, 20);
        term.render_widget(
            Sidebar::new(&menu, &claims, IconSet::new(IconMode::Ascii)),
            term.area(),
        );

        assert!(term.buffer_contains("/ lookup_"));
        assert!(term.buffer_contains("Lookup Types"));
        assert!(!term.buffer_contains("People"));
    }

    #[test]
    fn test_sidebar_no_matches() {
        let mut menu = MenuState::default();
        let claims = admin();
        menu.query = "zzz".to_string();
        let mut term = TestTerminal::with_size(28, 10);
        term.render_widget(
            Sidebar::new(&menu, &claims, IconSet::new(IconMode::Ascii)),
            term.area(),
        );

        assert!(term.buffer_contains("No matches"));
    }
}
