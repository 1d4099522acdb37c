//! Stage Result

use std::path::PathBuf;

use crate::domain::entities::InstalledPackageSet;

/// Result of a successful stage
#[derive(Debug, Clone)]
pub struct StageResult {
    /// Published stage directory
    pub stage_dir: PathBuf,
    /// What was installed
    pub installed: InstalledPackageSet,
    /// Packages served from the package cache
    pub cache_hits: usize,
    /// Packages copied from the index
    pub fetched: usize,
}
