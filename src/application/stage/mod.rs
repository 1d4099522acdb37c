//! Stage Module
//!
//! Dependency stager: turns the lock descriptor into an installed package
//! set under `<output>/stage`.
//!
//! ## Structure
//!
//! - `options` - Configuration types (`StageOptions`)
//! - `result` - Result types (`StageResult`)
//! - `use_case` - Core use case logic (`StageUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use berth::application::stage::{StageOptions, StageUseCase};
//!
//! let use_case = StageUseCase::new(lock_repo, index, record_repo, fs);
//! let result = use_case.execute(&StageOptions::new("berth.lock", "build"))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::{StageOptions, CACHE_DIR, INSTALL_RECORD_FILE, STAGE_DIR};
pub use result::StageResult;
pub use use_case::StageUseCase;

#[cfg(test)]
mod tests;
