//! Modal overlay helpers: placement, backdrop dimming and drop shadow.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Clear, Widget};

use crate::theme::palette;

/// Horizontal margin kept free around a modal on narrow terminals
const EDGE_MARGIN: u16 = 2;

/// Center a `width` x `height` rect inside `area`, clamped to the area.
///
/// ```
/// use ratatui::layout::Rect;
/// use farmdesk_tui::widgets::modal_overlay::centered_rect;
///
/// let modal = centered_rect(40, 10, Rect::new(0, 0, 80, 24));
/// assert_eq!(modal, Rect::new(20, 7, 40, 10));
/// ```
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Width for a modal of `preferred` columns, leaving a margin on both sides
/// when the terminal is narrower than that.
pub fn fit_width(preferred: u16, area: Rect) -> u16 {
    preferred.min(area.width.saturating_sub(EDGE_MARGIN * 2)).max(1)
}

/// Dim every cell in `area` to push the screen behind a modal back.
pub fn dim_background(buf: &mut Buffer, area: Rect) {
    let dim_style = Style::default()
        .fg(palette::TEXT_MUTED)
        .bg(palette::DEEPEST_BG);

    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_style(dim_style);
            }
        }
    }
}

/// One-cell shadow along the right and bottom edges of `modal_rect`.
pub fn render_shadow(buf: &mut Buffer, modal_rect: Rect) {
    let shadow_style = Style::default().fg(palette::SHADOW).bg(palette::SHADOW);

    let right_x = modal_rect.right();
    for y in modal_rect.y.saturating_add(1)..=modal_rect.bottom() {
        if let Some(cell) = buf.cell_mut((right_x, y)) {
            cell.set_char(' ');
            cell.set_style(shadow_style);
        }
    }

    let bottom_y = modal_rect.bottom();
    for x in modal_rect.x.saturating_add(1)..=modal_rect.right() {
        if let Some(cell) = buf.cell_mut((x, bottom_y)) {
            cell.set_char(' ');
            cell.set_style(shadow_style);
        }
    }
}

pub fn clear_area(buf: &mut Buffer, area: Rect) {
    Clear.render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let result = centered_rect(64, 10, Rect::new(0, 0, 30, 8));
        assert_eq!(result, Rect::new(0, 0, 30, 8));
    }

    #[test]
    fn test_centered_rect_with_offset_area() {
        let result = centered_rect(40, 10, Rect::new(10, 5, 80, 24));
        assert_eq!(result, Rect::new(30, 12, 40, 10));
    }

    #[test]
    fn test_fit_width_keeps_margin_on_narrow_terminals() {
        let area = Rect::new(0, 0, 60, 20);
        assert_eq!(fit_width(84, area), 56);
        assert_eq!(fit_width(44, area), 44);
    }

    #[test]
    fn test_dim_background_only_touches_area() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 10));
        dim_background(&mut buf, Rect::new(5, 3, 10, 5));

        assert_eq!(buf[(5, 3)].bg, palette::DEEPEST_BG);
        assert_eq!(buf[(14, 7)].fg, palette::TEXT_MUTED);
        assert_ne!(buf[(4, 3)].fg, palette::TEXT_MUTED);
    }

    #[test]
    fn test_render_shadow_offset() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 10));
        let modal = Rect::new(5, 2, 10, 6);
        render_shadow(&mut buf, modal);

        assert_eq!(buf[(15, 3)].bg, palette::SHADOW);
        assert_eq!(buf[(6, 8)].bg, palette::SHADOW);
        // Top-right corner stays clear
        assert_ne!(buf[(15, 2)].bg, palette::SHADOW);
    }

    #[test]
    fn test_render_shadow_at_buffer_edge_does_not_panic() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 10));
        render_shadow(&mut buf, Rect::new(8, 8, 2, 2));
    }

    #[test]
    fn test_clear_area_resets_cells() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        for y in 0..5 {
            for x in 0..10 {
                buf[(x, y)].set_char('X');
            }
        }

        clear_area(&mut buf, Rect::new(2, 2, 5, 2));
        assert_eq!(buf[(2, 2)].symbol(), " ");
        assert_eq!(buf[(1, 2)].symbol(), "X");
    }
}
