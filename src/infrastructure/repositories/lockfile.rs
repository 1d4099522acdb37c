//! TOML Lock Repository
//!
//! Reads `berth.lock`:
//!
//! ```toml
//! version = 1
//!
//! [[package]]
//! name = "starlette"
//! version = "0.46.2"
//! hash = "sha256:..."
//! dependencies = ["anyio"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::domain::entities::{LockDescriptor, LockedPackage};
use crate::domain::ports::file_system::{FileSystem, FsError};
use crate::domain::ports::LockRepository;
use crate::domain::value_objects::{ContentHash, PackageName};
use crate::error::DependencyResolutionError;
use crate::infrastructure::fs::LocalFs;

/// TOML-based lock repository
pub struct TomlLockRepository {
    fs: LocalFs,
}

impl TomlLockRepository {
    pub fn new() -> Self {
        Self { fs: LocalFs::new() }
    }
}

impl Default for TomlLockRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlLockedPackage {
    name: String,
    version: String,
    hash: String,
    #[serde(default)]
    dependencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TomlLock {
    version: u32,
    #[serde(default, rename = "package")]
    packages: Vec<TomlLockedPackage>,
}

/// Parse lock content. `path` is only used for error context.
pub fn parse_lock_descriptor(
    content: &str,
    path: &Path,
) -> Result<LockDescriptor, DependencyResolutionError> {
    let malformed = |message: String| DependencyResolutionError::LockMalformed {
        path: path.to_path_buf(),
        message,
    };

    let toml_lock: TomlLock = toml::from_str(content).map_err(|e| malformed(e.to_string()))?;

    let mut packages = Vec::with_capacity(toml_lock.packages.len());
    for entry in toml_lock.packages {
        let name = PackageName::new(&entry.name).map_err(|e| malformed(e.to_string()))?;
        let hash = ContentHash::parse(&entry.hash)
            .map_err(|e| malformed(format!("package '{}': {}", name, e)))?;
        let dependencies = entry
            .dependencies
            .iter()
            .map(|dep| PackageName::new(dep))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| malformed(format!("package '{}': {}", name, e)))?;
        packages.push(
            LockedPackage::new(name, entry.version.trim(), hash).with_dependencies(dependencies),
        );
    }

    LockDescriptor::new(toml_lock.version, packages).map_err(|e| malformed(e.to_string()))
}

impl LockRepository for TomlLockRepository {
    fn load(&self, path: &Path) -> Result<LockDescriptor, DependencyResolutionError> {
        let bytes = self.fs.read(path).map_err(|e| match e {
            FsError::NotFound(_) => DependencyResolutionError::LockMissing {
                path: path.to_path_buf(),
            },
            other => DependencyResolutionError::LockMalformed {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        })?;
        let content =
            String::from_utf8(bytes).map_err(|e| DependencyResolutionError::LockMalformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let lock = parse_lock_descriptor(&content, path)?;
        tracing::debug!(path = %path.display(), packages = lock.len(), "lock loaded");
        Ok(lock)
    }
}
