//! Main render/view function (View in TEA pattern)


use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use ratatui::Frame;

use farmdesk_app::modal::{Modal, ModalArea, ModalKind};
use farmdesk_app::state::{AppState, FocusRegion, SessionStatus, UiMode};

use crate::layout;
use crate::theme::{icons::IconSet, palette, styles};
use crate::widgets::{self, modal_overlay};

/// Border rows plus a one-column inner margin on each side
const MODAL_CHROME_HEIGHT: u16 = 2;
const MODAL_CHROME_WIDTH: u16 = 4;

/// Render the complete UI (View function in TEA)
///
/// Pure apart from recording where each modal landed, which mouse
/// hit-testing reads back.
pub fn view(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area);
    let icons = IconSet::new(state.settings.ui.icons);
    let current = state.current_resource();

    frame.render_widget(
        widgets::TopNav::new(state.claims(), state.session, icons)
            .resource(current)
            .busy(state.is_busy(), state.spinner_frame),
        areas.top_nav,
    );

    frame.render_widget(
        widgets::Sidebar::new(&state.menu, state.claims(), icons)
            .focused(state.focus == FocusRegion::Sidebar && state.ui_mode != UiMode::LoginRequired)
            .current(current),
        areas.sidebar,
    );

    match &state.screen {
        Some(screen) => {
            let filtering = state.ui_mode == UiMode::FilterInput;
            frame.render_widget(
                widgets::DataTable::new(screen)
                    .focused(state.focus == FocusRegion::Table && state.ui_mode == UiMode::Normal)
                    .filter_input(filtering.then_some(state.filter_input.as_str())),
                areas.content,
            );
            if state.ui_mode == UiMode::ColumnSelector && screen.columns.popover_open {
                frame.render_widget(
                    widgets::ColumnSelector::new(&screen.columns, icons),
                    areas.content,
                );
            }
        }
        None => render_welcome(frame.buffer_mut(), areas.content, state),
    }

    frame.render_widget(widgets::StatusBar::new(state), areas.status);

    if state.ui_mode == UiMode::LoginRequired {
        render_login_required(frame.buffer_mut(), area);
    }

    let buf = frame.buffer_mut();
    for modal in state.modals.iter_mut() {
        render_modal(buf, area, modal, icons);
    }
}

fn render_welcome(buf: &mut Buffer, area: Rect, state: &AppState) {
    let block = styles::glass_block(state.focus == FocusRegion::Table)
        .style(Style::default().bg(palette::CARD_BG));
    let inner = block.inner(area);
    block.render(area, buf);

    let text = match state.session {
        SessionStatus::Loading => "Loading your profile…",
        _ if state.menu.rows(state.claims()).is_empty() => {
            "No screens are available to your account"
        }
        _ => "Select a screen from the menu",
    };
    let top = inner.y + inner.height / 2;
    Paragraph::new(Span::styled(text, styles::text_muted()))
        .alignment(Alignment::Center)
        .render(Rect::new(inner.x, top, inner.width, 1.min(inner.height)), buf);
}

fn render_login_required(buf: &mut Buffer, area: Rect) {
    modal_overlay::dim_background(buf, area);
    let rect = modal_overlay::centered_rect(modal_overlay::fit_width(52, area), 8, area);
    modal_overlay::render_shadow(buf, rect);
    modal_overlay::clear_area(buf, rect);

    let block = styles::modal_block("Session expired");
    let inner = block.inner(rect).inner(ratatui::layout::Margin::new(1, 0));
    block.render(rect, buf);

    let lines = vec![
        Line::from(Span::styled(
            "The server rejected your credentials.",
            styles::text_primary(),
        )),
        Line::from(Span::styled(
            "Sign in again or update your API token, then retry.",
            styles::text_secondary(),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("r", styles::keybinding()),
            Span::styled(" retry   ", styles::text_muted()),
            Span::styled("q", styles::keybinding()),
            Span::styled(" quit", styles::text_muted()),
        ]),
    ];
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(inner, buf);
}

/// Draw one modal over everything beneath it and record its area.
fn render_modal(buf: &mut Buffer, area: Rect, modal: &mut Modal, icons: IconSet) {
    let width = modal_overlay::fit_width(modal.options.width.columns(), area);
    let content_width = width.saturating_sub(MODAL_CHROME_WIDTH);
    let content_height = match &modal.kind {
        ModalKind::Form(form) => widgets::FormModal::new(form, icons).height(),
        ModalKind::Confirm(dialog) => widgets::ConfirmModal::new(dialog, icons).height(content_width),
        ModalKind::Alert(alert) => widgets::AlertModal::new(alert, icons).height(content_width),
    };
    let rect = modal_overlay::centered_rect(width, content_height + MODAL_CHROME_HEIGHT, area);

    if modal.is_open() {
        modal_overlay::dim_background(buf, area);
    }
    modal_overlay::render_shadow(buf, rect);
    modal_overlay::clear_area(buf, rect);

    let mut block = styles::modal_block(&modal.options.title);
    if let Some(footer) = &modal.options.footer {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {footer} "),
            styles::text_muted(),
        )));
    }
    let inner = block.inner(rect).inner(ratatui::layout::Margin::new(1, 0));
    block.render(rect, buf);

    match &modal.kind {
        ModalKind::Form(form) => widgets::FormModal::new(form, icons).render(inner, buf),
        ModalKind::Confirm(dialog) => widgets::ConfirmModal::new(dialog, icons).render(inner, buf),
        ModalKind::Alert(alert) => widgets::AlertModal::new(alert, icons).render(inner, buf),
    }

    if modal.is_open() {
        modal.area = Some(ModalArea {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        });
    } else {
        // Exit transition: fade out and stop taking clicks
        modal_overlay::dim_background(buf, rect);
        modal.area = None;
    }
}
