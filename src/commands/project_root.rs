use std::path::{Path, PathBuf};

use berth::config::MANIFEST_FILE;

/// Discover the project root directory from an invocation directory.
///
/// Walking upward from `start`, the first directory holding `berth.toml`
/// wins, then the first with `.git`. Falls back to `start`.
pub(crate) fn discover_project_root(start: &Path) -> PathBuf {
    if let Some(dir) = start.ancestors().find(|d| d.join(MANIFEST_FILE).is_file()) {
        return dir.to_path_buf();
    }
    if let Some(dir) = start.ancestors().find(|d| d.join(".git").exists()) {
        return dir.to_path_buf();
    }
    start.to_path_buf()
}
