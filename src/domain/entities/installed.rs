//! Installed package set entity
//!
//! What the stager materialized: every locked package with the files it
//! contributed to `site-packages`. The assembler copies by this record rather
//! than by scanning the stage directory, so only recorded files can reach the
//! image.

use std::path::Path;

use crate::domain::value_objects::{ContentHash, PackageName};

/// Record format written alongside the staged files
pub const INSTALL_RECORD_VERSION: u32 = 1;

/// Normalize a relative path for records (always forward slashes).
pub fn normalize_record_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    name: PackageName,
    version: String,
    hash: ContentHash,
    files: Vec<String>,
}

impl InstalledPackage {
    pub fn new(
        name: PackageName,
        version: impl Into<String>,
        hash: ContentHash,
        mut files: Vec<String>,
    ) -> Self {
        files.sort();
        Self {
            name,
            version: version.into(),
            hash,
            files,
        }
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    /// Files relative to `site-packages`, sorted.
    pub fn files(&self) -> &[String] {
        &self.files
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledPackageSet {
    packages: Vec<InstalledPackage>,
}

impl InstalledPackageSet {
    pub fn new(mut packages: Vec<InstalledPackage>) -> Self {
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        Self { packages }
    }

    pub fn packages(&self) -> &[InstalledPackage] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.packages.iter().map(|p| p.files.len()).sum()
    }

    /// Package that installed `file`, if any.
    pub fn owner_of(&self, file: &str) -> Option<&InstalledPackage> {
        self.packages
            .iter()
            .find(|p| p.files.binary_search_by(|f| f.as_str().cmp(file)).is_ok())
    }
}
