//! Berth CLI - build and run minimal Python service images
//!
//! Usage: berth <COMMAND>
//!
//! Commands:
//!   stage     Install the locked dependencies into an isolated staging area
//!   assemble  Assemble the runtime image from staged packages and sources
//!   build     Stage, then assemble
//!   run       Start the image's entry module and wait for it
//!   up        Build, then run
//!   check     Validate the project without writing anything

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod ui;

use cli::{BuildArgs, Cli, Commands};
use commands::build::{cmd_build, BuildStep};
use commands::check::cmd_check;
use commands::context::CommandContext;
use commands::run::{cmd_run, cmd_up};
use ui::context::UiContext;

fn main() -> ExitCode {
    let cli = Cli::parse();
    berth::logging::init(cli.verbose);

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    }) {
        tracing::warn!(error = %e, "could not install Ctrl+C handler");
    }

    let json = cli.json;
    match dispatch(cli, cancel) {
        Ok(code) => ExitCode::from(exit_status(code)),
        Err(err) => {
            ui::error::print_error(&err, json);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli, cancel: Arc<AtomicBool>) -> Result<i32> {
    let ui = UiContext::new(cli.json, cli.verbose);
    let context = |build: &BuildArgs| {
        CommandContext::load(cli.project.as_deref(), &build.overrides(), ui, cancel.clone())
    };

    match &cli.command {
        Commands::Stage { build } => cmd_build(&context(build)?, BuildStep::Stage).map(|_| 0),
        Commands::Assemble { build } => {
            cmd_build(&context(build)?, BuildStep::Assemble).map(|_| 0)
        }
        Commands::Build { build } => cmd_build(&context(build)?, BuildStep::All).map(|_| 0),
        Commands::Run {
            image,
            startup_timeout,
        } => cmd_run(&context(&BuildArgs::default())?, image.clone(), *startup_timeout),
        Commands::Up {
            build,
            startup_timeout,
        } => cmd_up(&context(build)?, *startup_timeout),
        Commands::Check {
            build,
            strict_warnings,
        } => cmd_check(&context(build)?, *strict_warnings),
    }
}

/// Exit codes outside 0..=255 are reported as a generic failure.
fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
