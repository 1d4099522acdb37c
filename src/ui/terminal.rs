//! Terminal capability detection
//!
//! Color needs a TTY and no `NO_COLOR`; `FORCE_COLOR` overrides both.
//! Unicode icons are dropped for `TERM=dumb` and non-UTF-8 locales.

use is_terminal::IsTerminal;

/// What the attached terminal can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    pub is_tty: bool,
    pub supports_color: bool,
    pub supports_unicode: bool,
    pub is_ci: bool,
}

const CI_MARKERS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "CIRCLECI",
    "JENKINS_HOME",
];

pub fn detect_capabilities() -> TerminalCapabilities {
    capabilities_from(|key| std::env::var(key).ok(), std::io::stdout().is_terminal())
}

fn capabilities_from(env: impl Fn(&str) -> Option<String>, is_tty: bool) -> TerminalCapabilities {
    let dumb = env("TERM").is_some_and(|term| term.eq_ignore_ascii_case("dumb"));
    let forced = env("FORCE_COLOR").is_some_and(|v| !v.is_empty() && v != "0");

    TerminalCapabilities {
        is_tty,
        supports_color: forced || (is_tty && !dumb && env("NO_COLOR").is_none()),
        supports_unicode: !dumb && !ascii_locale(&env),
        is_ci: CI_MARKERS.iter().any(|key| env(key).is_some()),
    }
}

/// The first locale variable that is set decides; unset means UTF-8.
fn ascii_locale(env: &impl Fn(&str) -> Option<String>) -> bool {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .find_map(|key| env(key).filter(|v| !v.is_empty()))
        .is_some_and(|locale| {
            let locale = locale.to_ascii_lowercase();
            locale == "c" || locale == "posix"
        })
}
