use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Result;
use berth::config::ConfigWarning;
use berth::domain::ports::BuildEventSink;
use berth::{BuildSettings, Config, ConfigOverrides, JsonEventSink};

use crate::commands::project_root::discover_project_root;
use crate::ui::context::UiContext;
use crate::ui::events::ConsoleEventSink;
use crate::ui::output::print_config_warnings;

/// Everything a command needs after configuration is resolved
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
    pub ui: UiContext,
    pub cancel: Arc<AtomicBool>,
}

impl CommandContext {
    pub fn load(
        project: Option<&Path>,
        overrides: &ConfigOverrides,
        ui: UiContext,
        cancel: Arc<AtomicBool>,
    ) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let project_root = match project {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => cwd.join(path),
            None => discover_project_root(&cwd),
        };

        let (config, warnings) = Config::load_for_project(&project_root)?;
        let config = config.with_overrides(overrides);
        tracing::debug!(root = %project_root.display(), "project configuration loaded");

        Ok(Self {
            project_root,
            config,
            warnings,
            ui,
            cancel,
        })
    }

    pub fn settings(&self) -> Result<BuildSettings> {
        Ok(BuildSettings::from_config(&self.config, &self.project_root)?)
    }

    /// NDJSON on stdout with `--json`, console progress otherwise.
    /// JSON events are flushed one by one when output is unbuffered.
    pub fn event_sink(&self) -> Arc<dyn BuildEventSink> {
        if self.ui.json {
            Arc::new(JsonEventSink::stdout(self.config.env.unbuffered))
        } else {
            Arc::new(ConsoleEventSink::stdout(&self.ui))
        }
    }

    pub fn print_warnings(&self) {
        if !self.ui.json {
            print_config_warnings(&self.warnings, self.ui.color, self.ui.unicode);
        }
    }
}
