//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod hash;
mod ignore_patterns;
mod module_path;
mod package_name;

pub use hash::{ContentHash, HashParseError, TreeHasher};
pub use ignore_patterns::{IgnoreError, IgnorePatterns, IGNORE_FILE_NAME};
pub use module_path::{ModulePath, ModulePathError};
pub use package_name::{PackageName, PackageNameError};
