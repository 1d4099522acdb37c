//! Assemble Result

use std::path::PathBuf;

use crate::domain::entities::ImageManifest;
use crate::domain::value_objects::PackageName;

/// Result of a successful assembly
#[derive(Debug, Clone)]
pub struct AssembleResult {
    /// Published image directory
    pub image_dir: PathBuf,
    /// Manifest written into the image
    pub manifest: ImageManifest,
    /// Tooling packages that were staged but left out
    pub excluded: Vec<PackageName>,
    /// Files copied into `app/`
    pub source_file_count: usize,
    /// Files copied into `site-packages/`
    pub package_file_count: usize,
}
