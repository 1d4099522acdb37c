//! Launch Module
//!
//! Process entry point: starts the image's module as one long-running child
//! on the declared port and waits for it.
//!
//! ```ignore
//! let outcome = launch(&manifest_repo, &image_dir, &LaunchOptions::default(), sink, &cancel)?;
//!
//! // or step by step
//! let plan = LaunchPlan::prepare(&TomlImageManifestRepository::new(), &image_dir)?;
//! let process = start(&plan, &LaunchOptions::default(), sink, &cancel)?;
//! let outcome = process.wait(&cancel)?;
//! ```

mod plan;
mod process;

pub use plan::LaunchPlan;
pub use process::{
    launch, probe_port, start, LaunchOptions, LaunchOutcome, RunningProcess, SHUTDOWN_GRACE,
};
