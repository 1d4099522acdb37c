//! Stage Options

use std::path::PathBuf;

use crate::domain::entities::Requirement;

/// Options for the stage use case
#[derive(Debug, Clone)]
pub struct StageOptions {
    /// Path to `berth.lock`
    pub lock_path: PathBuf,
    /// Requirements declared by the project manifest
    pub requirements: Vec<Requirement>,
    /// Build output directory (`stage/` and `.cache/` live here)
    pub output_dir: PathBuf,
    /// Use a throwaway package cache instead of `<output>/.cache`
    pub no_cache: bool,
}

impl StageOptions {
    pub fn new(lock_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            lock_path: lock_path.into(),
            requirements: Vec::new(),
            output_dir: output_dir.into(),
            no_cache: false,
        }
    }

    pub fn with_requirements(mut self, requirements: Vec<Requirement>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    pub fn stage_dir(&self) -> PathBuf {
        self.output_dir.join(STAGE_DIR)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.output_dir.join(CACHE_DIR).join("packages")
    }
}

/// Published installed package set, under the output directory
pub const STAGE_DIR: &str = "stage";

/// Persistent package cache, under the output directory
pub const CACHE_DIR: &str = ".cache";

/// Install record inside the stage directory
pub const INSTALL_RECORD_FILE: &str = "installed.toml";
