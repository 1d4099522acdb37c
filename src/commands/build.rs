use anyhow::Result;
use berth::BuildPipeline;

use crate::commands::context::CommandContext;

/// Which part of the build to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Stage,
    Assemble,
    All,
}

pub fn cmd_build(ctx: &CommandContext, step: BuildStep) -> Result<()> {
    ctx.print_warnings();

    let pipeline = BuildPipeline::new(ctx.settings()?)
        .with_event_sink(ctx.event_sink())
        .with_cancel_flag(ctx.cancel.clone());

    match step {
        BuildStep::Stage => {
            pipeline.stage()?;
        }
        BuildStep::Assemble => {
            pipeline.assemble()?;
        }
        BuildStep::All => {
            pipeline.build()?;
        }
    }
    Ok(())
}
