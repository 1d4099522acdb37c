use crossterm::style::Stylize;

use crate::ui::theme::{self, Glyph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Arrow,
    Stage,
    Image,
    Run,
    Check,
}

impl Icon {
    fn glyph(self) -> Glyph {
        match self {
            Icon::Success => theme::SUCCESS,
            Icon::Error => theme::ERROR,
            Icon::Warning => theme::WARNING,
            Icon::Arrow => theme::ARROW,
            Icon::Stage => theme::STAGE,
            Icon::Image => theme::IMAGE,
            Icon::Run => theme::RUN,
            Icon::Check => theme::CHECK,
        }
    }

    pub fn render(&self, supports_unicode: bool) -> &'static str {
        let glyph = self.glyph();
        if supports_unicode {
            glyph.unicode
        } else {
            glyph.ascii
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let text = self.render(supports_unicode);
        if supports_color {
            text.with(self.glyph().color).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Dim text, or plain text without color support
pub fn dim(text: &str, supports_color: bool) -> String {
    if supports_color {
        text.with(theme::colors::DIM).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_fallbacks() {
        assert_eq!(Icon::Success.render(false), "[OK]");
        assert_eq!(Icon::Run.render(false), "[RUN]");
        assert_eq!(Icon::Error.colored(false, false), "[FAIL]");
    }

    #[test]
    fn unicode_glyphs() {
        assert_eq!(Icon::Warning.render(true), "⚠");
        assert_eq!(Icon::Arrow.render(true), "↳");
    }

    #[test]
    fn color_wraps_in_escape_codes() {
        let colored = Icon::Success.colored(true, true);
        assert!(colored.contains('✓'));
        assert!(colored.starts_with('\u{1b}'));
        assert_eq!(dim("x", false), "x");
    }
}
