//! Top navigation bar
//!
//! App name and the open screen on the left, the busy spinner and the
//! signed-in user on the right.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use farmdesk_app::auth::Claims;
use farmdesk_app::state::SessionStatus;
use farmdesk_core::Resource;

use crate::theme::{icons::IconSet, palette, styles};

pub const APP_NAME: &str = "Farmdesk";

pub struct TopNav<'a> {
    claims: &'a Claims,
    session: SessionStatus,
    resource: Option<Resource>,
    busy: bool,
    spinner_frame: usize,
    icons: IconSet,
}

impl<'a> TopNav<'a> {
    pub fn new(claims: &'a Claims, session: SessionStatus, icons: IconSet) -> Self {
        Self {
            claims,
            session,
            resource: None,
            busy: false,
            spinner_frame: 0,
            icons,
        }
    }

    pub fn resource(mut self, resource: Option<Resource>) -> Self {
        self.resource = resource;
        self
    }

    pub fn busy(mut self, busy: bool, spinner_frame: usize) -> Self {
        self.busy = busy;
        self.spinner_frame = spinner_frame;
        self
    }

    fn user_label(&self) -> (String, Style) {
        match self.session {
            SessionStatus::Loading => ("Signing in…".to_string(), styles::text_muted()),
            SessionStatus::Anonymous => ("Guest".to_string(), styles::text_secondary()),
            SessionStatus::Expired => ("Session expired".to_string(), styles::status_red()),
            SessionStatus::SignedIn => {
                let name = if self.claims.display_name.is_empty() {
                    self.claims.username.clone()
                } else {
                    self.claims.display_name.clone()
                };
                (name, styles::text_primary())
            }
        }
    }
}

impl Widget for TopNav<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let title = self.resource.map(Resource::title).unwrap_or("Dashboard");
        let left = Line::from(vec![
            Span::raw(" "),
            Span::styled(APP_NAME, styles::accent_bold()),
            Span::raw(" "),
            Span::styled("/", styles::text_muted()),
            Span::raw(" "),
            Span::styled(title, styles::text_secondary()),
        ]);

        let (user, user_style) = self.user_label();
        let mut right_spans = Vec::new();
        if self.busy {
            right_spans.push(Span::styled(self.icons.spinner(self.spinner_frame), styles::accent()));
            right_spans.push(Span::raw(" "));
        }
        right_spans.push(Span::styled(self.icons.user(), styles::accent()));
        right_spans.push(Span::raw(" "));
        right_spans.push(Span::styled(user, user_style));
        right_spans.push(Span::raw(" "));
        let right = Line::from(right_spans);

        let left_width = left.width() as u16;
        let right_width = right.width() as u16;
        let row = Rect::new(inner.x, inner.y, inner.width, 1);
        Paragraph::new(left).render(row, buf);

        // Drop the user label rather than overlap the title
        if left_width + right_width < inner.width {
            let right_area = Rect::new(
                inner.x + inner.width - right_width,
                inner.y,
                right_width,
                1,
            );
            Paragraph::new(right).render(right_area, buf);
        }
    }
}
