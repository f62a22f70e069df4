//! Icon set for the TUI.
//!
//! Resolves glyphs at runtime from the configured `IconMode`.

use farmdesk_app::config::IconMode;

/// Braille spinner frames
const SPINNER_UNICODE: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const SPINNER_ASCII: [&str; 4] = ["|", "/", "-", "\\"];

/// Runtime icon resolver.
#[derive(Debug, Clone, Copy)]
pub struct IconSet {
    mode: IconMode,
}

impl IconSet {
    pub fn new(mode: IconMode) -> Self {
        Self { mode }
    }

    pub fn spinner(&self, frame: usize) -> &'static str {
        match self.mode {
            IconMode::Unicode => SPINNER_UNICODE[frame % SPINNER_UNICODE.len()],
            IconMode::Ascii => SPINNER_ASCII[frame % SPINNER_ASCII.len()],
        }
    }

    pub fn expanded(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "▾",
            IconMode::Ascii => "v",
        }
    }

    pub fn collapsed(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "▸",
            IconMode::Ascii => ">",
        }
    }

    pub fn checked(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "☑",
            IconMode::Ascii => "[x]",
        }
    }

    pub fn unchecked(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "☐",
            IconMode::Ascii => "[ ]",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "→",
            IconMode::Ascii => "->",
        }
    }

    pub fn user(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "●",
            IconMode::Ascii => "@",
        }
    }

    pub fn alert(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "⚠",
            IconMode::Ascii => "!",
        }
    }

    pub fn info(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "ℹ",
            IconMode::Ascii => "i",
        }
    }

    pub fn ok(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "✓",
            IconMode::Ascii => "ok",
        }
    }

    pub fn taken(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "✗",
            IconMode::Ascii => "x",
        }
    }
}
