//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod build_events;
pub mod file_system;
pub mod lock_repository;
pub mod package_index;
pub mod record_repository;

pub use build_events::{BuildEvent, BuildEventSink, NoopEventSink, PackageSource};
pub use file_system::{FileSystem, FsError, FsResult};
pub use lock_repository::LockRepository;
pub use package_index::{IndexError, PackageIndex};
pub use record_repository::{
    ImageManifestRepository, InstallRecordRepository, RecordError,
};
