//! Color and glyph tokens for console output
//!
//! Every icon has a Unicode form, an ASCII fallback and one semantic color.

use crossterm::style::Color;

pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    /// Stage and command markers
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub unicode: &'static str,
    pub ascii: &'static str,
    pub color: Color,
}

const fn glyph(unicode: &'static str, ascii: &'static str, color: Color) -> Glyph {
    Glyph {
        unicode,
        ascii,
        color,
    }
}

pub const SUCCESS: Glyph = glyph("✓", "[OK]", colors::SUCCESS);
pub const ERROR: Glyph = glyph("✗", "[FAIL]", colors::ERROR);
pub const WARNING: Glyph = glyph("⚠", "[WARN]", colors::WARNING);
pub const ARROW: Glyph = glyph("↳", "[>]", colors::DIM);

pub const STAGE: Glyph = glyph("📦", "[STAGE]", colors::INFO);
pub const IMAGE: Glyph = glyph("🧱", "[IMAGE]", colors::INFO);
pub const RUN: Glyph = glyph("▶", "[RUN]", colors::INFO);
pub const CHECK: Glyph = glyph("🔍", "[CHECK]", colors::INFO);
