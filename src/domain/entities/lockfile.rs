//! Lock descriptor entity
//!
//! The exact, pinned set of packages a build installs. It is a pure data
//! structure produced by `LockRepository` and never mutated by a build.

use std::collections::BTreeMap;

use crate::domain::entities::Requirement;
use crate::domain::value_objects::{ContentHash, PackageName};

/// Lock format understood by this version of berth
pub const LOCK_FORMAT_VERSION: u32 = 1;

/// One pinned package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedPackage {
    name: PackageName,
    version: String,
    hash: ContentHash,
    dependencies: Vec<PackageName>,
}

impl LockedPackage {
    pub fn new(name: PackageName, version: impl Into<String>, hash: ContentHash) -> Self {
        Self {
            name,
            version: version.into(),
            hash,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, mut dependencies: Vec<PackageName>) -> Self {
        dependencies.sort();
        dependencies.dedup();
        self.dependencies = dependencies;
        self
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

    pub fn dependencies(&self) -> &[PackageName] {
        &self.dependencies
    }

    /// `name-version`, used for cache directory names
    pub fn slug(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

/// Structural problems with a lock descriptor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockViolation {
    #[error("unsupported lock format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("package '{0}' is locked more than once")]
    Duplicate(PackageName),

    #[error("package '{0}' has an empty version")]
    EmptyVersion(PackageName),

    #[error("package '{package}' has version '{version}', which is not a plain version string")]
    UnsafeVersion { package: PackageName, version: String },

    #[error("package '{package}' depends on '{dependency}', which is not locked")]
    DanglingDependency {
        package: PackageName,
        dependency: PackageName,
    },

    #[error("requirement '{0}' is not locked")]
    NotLocked(String),
}

/// Versions name index and cache directories, so they must be a single
/// path component: PEP 440 characters only, no leading dot, no `..`.
fn is_plain_version(version: &str) -> bool {
    version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '+' | '!'))
        && !version.starts_with('.')
        && !version.contains("..")
}

/// The validated lock descriptor, keyed by normalized package name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LockDescriptor {
    packages: BTreeMap<PackageName, LockedPackage>,
}

impl LockDescriptor {
    /// Build a descriptor, rejecting duplicates, empty or path-like versions
    /// and dependencies on packages that are not themselves locked.
    pub fn new(version: u32, packages: Vec<LockedPackage>) -> Result<Self, LockViolation> {
        if version != LOCK_FORMAT_VERSION {
            return Err(LockViolation::UnsupportedVersion {
                found: version,
                expected: LOCK_FORMAT_VERSION,
            });
        }

        let mut map = BTreeMap::new();
        for package in packages {
            if package.version.trim().is_empty() {
                return Err(LockViolation::EmptyVersion(package.name));
            }
            if !is_plain_version(&package.version) {
                return Err(LockViolation::UnsafeVersion {
                    version: package.version.clone(),
                    package: package.name,
                });
            }
            if map.contains_key(&package.name) {
                return Err(LockViolation::Duplicate(package.name));
            }
            map.insert(package.name.clone(), package);
        }

        for package in map.values() {
            if let Some(missing) = package
                .dependencies
                .iter()
                .find(|dep| !map.contains_key(*dep))
            {
                return Err(LockViolation::DanglingDependency {
                    package: package.name.clone(),
                    dependency: missing.clone(),
                });
            }
        }

        Ok(Self { packages: map })
    }

    pub fn version(&self) -> u32 {
        LOCK_FORMAT_VERSION
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn get(&self, name: &PackageName) -> Option<&LockedPackage> {
        self.packages.get(name)
    }

    /// Packages in name order. Installation follows this order, which keeps
    /// the installed set independent of lock file layout.
    pub fn packages(&self) -> impl Iterator<Item = &LockedPackage> {
        self.packages.values()
    }

    /// Every manifest requirement must name a locked package.
    pub fn check_requirements(&self, requirements: &[Requirement]) -> Result<(), LockViolation> {
        match requirements
            .iter()
            .find(|req| !self.packages.contains_key(req.name()))
        {
            Some(req) => Err(LockViolation::NotLocked(req.raw().to_string())),
            None => Ok(()),
        }
    }
}
