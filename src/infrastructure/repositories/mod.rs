//! Repository Implementations

mod image;
mod installed;
mod lockfile;

pub use image::TomlImageManifestRepository;
pub use installed::TomlInstallRecordRepository;
pub use lockfile::{parse_lock_descriptor, TomlLockRepository};
