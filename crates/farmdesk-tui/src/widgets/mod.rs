//! Custom widget components

mod alert_modal;
mod column_selector;
mod confirm_modal;
mod data_table;
mod form_modal;
pub mod modal_overlay;
mod search_input;
mod sidebar;
mod status_bar;
mod top_nav;

pub use alert_modal::AlertModal;
pub use column_selector::ColumnSelector;
pub use confirm_modal::ConfirmModal;
pub use data_table::DataTable;
pub use form_modal::FormModal;
pub use search_input::SearchInput;
pub use sidebar::Sidebar;
pub use status_bar::StatusBar;
pub use top_nav::TopNav;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to at most `max` display columns, marking the cut with `…`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("Kisumu", 10), "Kisumu");
    }

    #[test]
    fn test_truncate_marks_cut() {
        assert_eq!(truncate("Nyandarua County", 8), "Nyandar…");
        assert_eq!(truncate("Nyandarua County", 8).width(), 8);
    }

    #[test]
    fn test_truncate_zero_width() {
        assert_eq!(truncate("abc", 0), "");
    }
}
