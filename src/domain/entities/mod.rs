//! Domain Entities
//!
//! - `LockDescriptor` - the pinned package set a build installs
//! - `Requirement` - a dependency named by the project manifest
//! - `InstalledPackageSet` - what the stager put into `site-packages`
//! - `ImageManifest` - how a finished runtime image is launched

mod image;
mod installed;
mod lockfile;
mod requirement;

pub use image::{
    EntryPoint, ImageManifest, ImagePackage, APP_DIR, IMAGE_FORMAT_VERSION, IMAGE_MANIFEST_FILE,
    SITE_PACKAGES_DIR,
};
pub use installed::{
    normalize_record_path, InstalledPackage, InstalledPackageSet, INSTALL_RECORD_VERSION,
};
pub use lockfile::{LockDescriptor, LockViolation, LockedPackage, LOCK_FORMAT_VERSION};
pub use requirement::Requirement;
