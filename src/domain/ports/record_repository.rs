//! Record repositories - persistence for build artifacts' metadata
//!
//! The installed-set record (`installed.toml`) and the image manifest
//! (`berth-image.toml`) are written by one stage and read by the next.

use std::path::Path;

use crate::domain::entities::{ImageManifest, InstalledPackageSet};

/// Record operation errors
#[derive(Debug)]
pub enum RecordError {
    /// Record file does not exist
    NotFound,
    /// Record exists but cannot be understood
    InvalidFormat(String),
    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::NotFound => write!(f, "record not found"),
            RecordError::InvalidFormat(msg) => write!(f, "invalid record format: {}", msg),
            RecordError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for RecordError {}

pub trait InstallRecordRepository {
    fn load(&self, path: &Path) -> Result<InstalledPackageSet, RecordError>;
    fn save(&self, set: &InstalledPackageSet, path: &Path) -> Result<(), RecordError>;
}

pub trait ImageManifestRepository {
    fn load(&self, path: &Path) -> Result<ImageManifest, RecordError>;
    fn save(&self, manifest: &ImageManifest, path: &Path) -> Result<(), RecordError>;
}
