use crate::ui::terminal::{detect_capabilities, TerminalCapabilities};

/// How the current invocation should render output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    pub json: bool,
    pub verbose: u8,
    pub color: bool,
    pub unicode: bool,
    /// Per-package progress lines
    pub progress: bool,
}

impl UiContext {
    pub fn new(json: bool, verbose: u8) -> Self {
        Self::from_caps(json, verbose, detect_capabilities())
    }

    pub(crate) fn from_caps(json: bool, verbose: u8, caps: TerminalCapabilities) -> Self {
        let color = !json && caps.supports_color && !caps.is_ci;
        let progress = !json && (verbose > 0 || (caps.is_tty && !caps.is_ci));

        Self {
            json,
            verbose,
            color,
            unicode: caps.supports_unicode,
            progress,
        }
    }
}
