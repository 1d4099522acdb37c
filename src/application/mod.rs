//! Application Layer
//!
//! Use cases that orchestrate the build flow. This layer depends on the
//! domain ports and never on a concrete file system or index.
//!
//! ## Use Cases
//!
//! - `StageUseCase` - Resolve the lock into an isolated `site-packages`
//! - `AssembleUseCase` - Combine staged packages and sources into an image
//! - `CheckUseCase` - Report every problem a build would hit, writing nothing
//! - `BuildPipeline` - Wire stage and assemble to local infrastructure
//! - `launch` - Start the image's entry module on its port

pub mod assemble;
pub mod check;
pub mod launch;
pub mod pipeline;
pub mod stage;

pub use assemble::{AssembleOptions, AssembleResult, AssembleUseCase, EnvOptions};
pub use check::{CheckItem, CheckResult, CheckStatus, CheckUseCase};
pub use launch::{LaunchOptions, LaunchOutcome, LaunchPlan};
pub use pipeline::{BuildPipeline, BuildResult, BuildSettings};
pub use stage::{StageOptions, StageResult, StageUseCase};
