//! User configuration directory resolution with test isolation support.
//!
//! `dirs::config_dir()` consults platform APIs that ignore `HOME` and
//! `XDG_CONFIG_HOME` overrides on some systems, so tests point berth at a
//! scratch directory through `BERTH_CONFIG_HOME` instead.

use std::path::PathBuf;

/// Environment variable overriding the user configuration directory.
pub const BERTH_CONFIG_HOME_VAR: &str = "BERTH_CONFIG_HOME";

/// Directory holding the user-level `config.toml`.
///
/// Returns `None` if neither the override is set nor the platform config
/// directory can be resolved.
pub fn berth_config_dir() -> Option<PathBuf> {
    std::env::var_os(BERTH_CONFIG_HOME_VAR)
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|dir| dir.join("berth")))
}
