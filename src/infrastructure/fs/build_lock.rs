//! Exclusive advisory lock on a build output directory
//!
//! Two builds writing the same `stage/` and `image/` would interleave their
//! renames. The lock file lives next to them and is released on drop.

use std::fs;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{BerthError, BerthResult};

const LOCK_FILE_NAME: &str = ".berth-build.lock";

#[derive(Debug)]
pub struct BuildLock {
    file: fs::File,
    path: PathBuf,
}

impl BuildLock {
    /// Take the lock without waiting.
    pub fn acquire(output_dir: &Path) -> BerthResult<Self> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(LOCK_FILE_NAME);
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| BerthError::BuildLocked {
                path: output_dir.to_path_buf(),
            })?;
        tracing::debug!(path = %path.display(), "build lock acquired");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}
