//! Configuration module for Berth
//!
//! Implements the configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (BERTH_*)
//! 3. Project manifest (berth.toml)
//! 4. User config (~/.config/berth/config.toml)
//! 5. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{with_env_overrides_from, ConfigWarning, USER_CONFIG_FILE};
pub use types::{
    BuildConfig, Config, ConfigOverrides, EnvConfig, ProjectConfig, RuntimeConfig,
    DEFAULT_TOOLING, MANIFEST_FILE,
};
