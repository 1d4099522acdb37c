use std::path::PathBuf;

use berth::ConfigOverrides;
use clap::{Args, Parser, Subcommand};

/// Berth - build and run minimal Python service images
#[derive(Parser, Debug)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events on stdout (for CI)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project root (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the locked dependencies into an isolated staging area
    Stage {
        #[command(flatten)]
        build: BuildArgs,
    },

    /// Assemble the runtime image from the staged packages and sources
    Assemble {
        #[command(flatten)]
        build: BuildArgs,
    },

    /// Stage, then assemble
    Build {
        #[command(flatten)]
        build: BuildArgs,
    },

    /// Start the image's entry module and wait for it to exit
    Run {
        /// Image directory (defaults to <output>/image)
        #[arg(long)]
        image: Option<PathBuf>,

        /// Seconds to wait for the port to accept connections (0 disables)
        #[arg(long)]
        startup_timeout: Option<u64>,
    },

    /// Build, then run
    Up {
        #[command(flatten)]
        build: BuildArgs,

        /// Seconds to wait for the port to accept connections (0 disables)
        #[arg(long)]
        startup_timeout: Option<u64>,
    },

    /// Validate configuration, lock, index and sources without writing
    Check {
        #[command(flatten)]
        build: BuildArgs,

        /// Fail on warnings too (CI mode)
        #[arg(long)]
        strict_warnings: bool,
    },
}

/// Flags that override the configuration hierarchy
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Port the entry point listens on
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Python interpreter recorded in the image
    #[arg(long)]
    pub interpreter: Option<String>,

    /// Package index directory
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Output directory for stage and image
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use a throwaway package cache and set PIP_NO_CACHE_DIR
    #[arg(long, conflicts_with = "cache")]
    pub no_cache: bool,

    /// Reuse the package cache under <output>/.cache
    #[arg(long)]
    pub cache: bool,

    /// Do not set PYTHONUNBUFFERED in the image
    #[arg(long)]
    pub buffered: bool,
}

impl BuildArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            interpreter: self.interpreter.clone(),
            index: self.index.clone(),
            output: self.output.clone(),
            no_cache: match (self.no_cache, self.cache) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            unbuffered: self.buffered.then_some(false),
        }
    }
}
