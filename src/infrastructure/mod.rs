//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local file system, build lock, config home
//! - `index/` - Directory-backed package index
//! - `repositories/` - Lock, install record and image manifest persistence
//! - `events/` - Event sinks

pub mod events;
pub mod fs;
pub mod index;
pub mod repositories;

// Re-export for convenience
pub use events::JsonEventSink;
pub use fs::{BuildLock, LocalFs};
pub use index::LocalPackageIndex;
pub use repositories::{
    TomlImageManifestRepository, TomlInstallRecordRepository, TomlLockRepository,
};
