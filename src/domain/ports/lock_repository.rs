//! LockRepository port - loading the lock descriptor
//!
//! The lock is read-only to berth: there is no save.

use std::path::Path;

use crate::domain::entities::LockDescriptor;
use crate::error::DependencyResolutionError;

pub trait LockRepository {
    /// Load and validate the lock descriptor at `path`.
    ///
    /// A missing file is `LockMissing`; anything unparsable or structurally
    /// invalid is `LockMalformed`.
    fn load(&self, path: &Path) -> Result<LockDescriptor, DependencyResolutionError>;
}
