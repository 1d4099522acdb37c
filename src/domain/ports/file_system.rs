//! FileSystem port - abstraction over file I/O operations
//!
//! The stager and assembler only touch disk through this trait.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::{ContentHash, TreeHasher};

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug)]
pub enum FsError {
    /// File not found
    NotFound(PathBuf),
    /// Permission denied
    PermissionDenied(PathBuf),
    /// I/O error
    Io(PathBuf, std::io::Error),
}

impl FsError {
    /// Attach the path an [`std::io::Error`] happened on.
    pub fn at(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io(path.to_path_buf(), err),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FsError::NotFound(p) | FsError::PermissionDenied(p) | FsError::Io(p, _) => p,
        }
    }

    /// Convert back into an `io::Error`, preserving the kind.
    pub fn into_io(self) -> std::io::Error {
        match self {
            FsError::NotFound(p) => std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("not found: {}", p.display()),
            ),
            FsError::PermissionDenied(p) => std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", p.display()),
            ),
            FsError::Io(_, err) => err,
        }
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            FsError::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            FsError::Io(path, err) => write!(f, "I/O error on {}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for FsError {}

/// Abstract file system interface
pub trait FileSystem {
    /// Read file content as bytes
    fn read(&self, path: &Path) -> FsResult<Vec<u8>>;

    /// Write content to file atomically, creating parent directories
    fn write(&self, path: &Path, content: &[u8]) -> FsResult<()>;

    /// Copy a single file, creating parent directories
    fn copy_file(&self, from: &Path, to: &Path) -> FsResult<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Create directory and parents
    fn create_dir_all(&self, path: &Path) -> FsResult<()>;

    /// Remove a directory tree; missing directories are not an error
    fn remove_dir_all(&self, path: &Path) -> FsResult<()>;

    /// Rename a file or directory
    fn rename(&self, from: &Path, to: &Path) -> FsResult<()>;

    /// All regular files under `root`, relative to it, sorted.
    fn list_files(&self, root: &Path) -> FsResult<Vec<PathBuf>>;

    /// Tree digest of every regular file under `root`.
    ///
    /// Records are ordered by their `/`-joined path string, not by path
    /// components, so `pkg-1.0.dist-info/METADATA` precedes `pkg/mod.py`.
    fn tree_digest(&self, root: &Path) -> FsResult<ContentHash> {
        let mut files: Vec<(String, PathBuf)> = self
            .list_files(root)?
            .into_iter()
            .map(|rel| (rel.to_string_lossy().replace('\\', "/"), rel))
            .collect();
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let mut hasher = TreeHasher::new();
        for (key, rel) in files {
            let content = self.read(&root.join(&rel))?;
            hasher.add_file(&key, &content);
        }
        Ok(hasher.finish())
    }

    /// Copy every regular file under `from` into `to`, returning the copied
    /// relative paths in sorted order.
    fn copy_tree(&self, from: &Path, to: &Path) -> FsResult<Vec<PathBuf>> {
        let files = self.list_files(from)?;
        self.create_dir_all(to)?;
        for rel in &files {
            self.copy_file(&from.join(rel), &to.join(rel))?;
        }
        Ok(files)
    }
}
