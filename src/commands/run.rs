use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use berth::application::launch::{launch, LaunchOptions};
use berth::infrastructure::TomlImageManifestRepository;

use crate::commands::build::{cmd_build, BuildStep};
use crate::commands::context::CommandContext;

/// Launch an existing image. Returns the process exit code.
pub fn cmd_run(
    ctx: &CommandContext,
    image: Option<PathBuf>,
    startup_timeout: Option<u64>,
) -> Result<i32> {
    let settings = ctx.settings()?;
    let image_dir = match image {
        Some(path) if path.is_absolute() => path,
        Some(path) => std::env::current_dir()?.join(path),
        None => settings.image_dir(),
    };
    let options = LaunchOptions {
        startup_timeout: match startup_timeout {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => settings.startup_timeout,
        },
    };

    let outcome = launch(
        &TomlImageManifestRepository::new(),
        &image_dir,
        &options,
        ctx.event_sink(),
        &ctx.cancel,
    )?;
    Ok(outcome.exit_code())
}

/// Build, then launch the fresh image.
pub fn cmd_up(ctx: &CommandContext, startup_timeout: Option<u64>) -> Result<i32> {
    cmd_build(ctx, BuildStep::All)?;
    cmd_run(ctx, None, startup_timeout)
}
