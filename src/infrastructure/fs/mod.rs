//! File System Implementations
//!
//! Concrete implementations of the FileSystem port plus output-directory
//! locking.

mod build_lock;
mod home;
mod local;

pub use build_lock::BuildLock;
pub use home::{berth_config_dir, BERTH_CONFIG_HOME_VAR};
pub use local::LocalFs;
