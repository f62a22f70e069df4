//! Color palette.

use ratatui::style::Color;

// --- Background layers ---
pub const DEEPEST_BG: Color = Color::Black;
pub const CARD_BG: Color = Color::Rgb(14, 17, 23);
pub const POPUP_BG: Color = Color::Rgb(28, 33, 43);
pub const ROW_ALT_BG: Color = Color::Rgb(18, 21, 28);

// --- Borders ---
pub const BORDER_DIM: Color = Color::DarkGray;
pub const BORDER_ACTIVE: Color = Color::Green;

// --- Accent ---
pub const ACCENT: Color = Color::Green;
/// Foreground on accent backgrounds
pub const CONTRAST_FG: Color = Color::Black;

// --- Text ---
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Gray;
pub const TEXT_MUTED: Color = Color::DarkGray;

// --- Status ---
pub const STATUS_GREEN: Color = Color::Green;
pub const STATUS_RED: Color = Color::Red;
pub const STATUS_YELLOW: Color = Color::Yellow;
pub const STATUS_BLUE: Color = Color::Blue;

// --- Effects ---
pub const SHADOW: Color = Color::Rgb(5, 6, 8);

// --- Change diff ---
pub const DIFF_OLD: Color = Color::LightRed;
pub const DIFF_NEW: Color = Color::LightGreen;

// --- Form inputs ---
pub const INPUT_BG: Color = Color::Rgb(40, 44, 56);
pub const INPUT_ACTIVE_BG: Color = Color::Rgb(60, 66, 84);
