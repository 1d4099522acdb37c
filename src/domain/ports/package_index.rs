//! PackageIndex port - where locked distributions are fetched from

use std::path::{Path, PathBuf};

use crate::domain::value_objects::PackageName;

/// Lookup failures
#[derive(Debug)]
pub enum IndexError {
    /// The index has no distribution for this exact version
    NotFound { available: Vec<String> },
    /// The index itself could not be read
    Io(std::io::Error),
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexError::NotFound { available } if available.is_empty() => {
                write!(f, "not found")
            }
            IndexError::NotFound { available } => {
                write!(f, "not found (available: {})", available.join(", "))
            }
            IndexError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for IndexError {}

/// A source of unpacked package distributions.
pub trait PackageIndex {
    /// Location shown in error messages
    fn root(&self) -> &Path;

    /// Directory holding the unpacked distribution of `name==version`.
    fn locate(&self, name: &PackageName, version: &str) -> Result<PathBuf, IndexError>;
}
