//! Runtime image manifest entity
//!
//! Describes a finished image: how to launch it and what went into it. The
//! manifest is the last file written during assembly, so its presence marks
//! the image as complete.

use std::collections::BTreeMap;

use crate::domain::value_objects::{ContentHash, ModulePath, PackageName};

/// Manifest format understood by this version of berth
pub const IMAGE_FORMAT_VERSION: u32 = 1;

/// File name of the manifest inside the image directory
pub const IMAGE_MANIFEST_FILE: &str = "berth-image.toml";

/// Directory holding installed packages inside the image
pub const SITE_PACKAGES_DIR: &str = "site-packages";

/// Directory holding the application source tree inside the image
pub const APP_DIR: &str = "app";

/// The process entry point invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub module: ModulePath,
    pub port: u16,
    pub interpreter: String,
}

impl Default for EntryPoint {
    fn default() -> Self {
        Self {
            module: ModulePath::default(),
            port: 8000,
            interpreter: "python3".to_string(),
        }
    }
}

/// A package present in the image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePackage {
    pub name: PackageName,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageManifest {
    pub project: String,
    pub entry: EntryPoint,
    /// Environment the entry point is started with
    pub env: BTreeMap<String, String>,
    pub packages: Vec<ImagePackage>,
    pub site_packages_digest: ContentHash,
    pub app_digest: ContentHash,
}

impl ImageManifest {
    pub fn version(&self) -> u32 {
        IMAGE_FORMAT_VERSION
    }

    pub fn has_package(&self, name: &PackageName) -> bool {
        self.packages.iter().any(|p| &p.name == name)
    }
}
