//! Berth - build and run minimal Python service images
//!
//! A build has two stages and a launch step:
//!
//! 1. **Stage**: install the locked dependency set into an isolated
//!    `site-packages` (`application::stage`)
//! 2. **Assemble**: copy staged packages and project sources into a clean
//!    runtime image, leaving build-only tooling behind (`application::assemble`)
//! 3. **Launch**: start the image's entry module on its declared port
//!    (`application::launch`)
//!
//! Each stage has its own error type; see [`error`].

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

// Re-exports for convenience
pub use application::{BuildPipeline, BuildSettings, CheckUseCase, LaunchPlan};
pub use config::{Config, ConfigOverrides};
pub use error::{BerthError, BerthResult};
pub use infrastructure::JsonEventSink;
