//! Build Pipeline
//!
//! Wires the stager and assembler to local infrastructure and runs them
//! under the output directory's build lock. `build` is fail-fast: a
//! dependency failure happens before any source file is copied.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::config::Config;
use crate::domain::entities::{EntryPoint, Requirement};
use crate::domain::ports::{BuildEventSink, FileSystem, FsError, NoopEventSink};
use crate::domain::value_objects::PackageName;
use crate::error::{BerthError, BerthResult};
use crate::infrastructure::{
    BuildLock, LocalFs, LocalPackageIndex, TomlImageManifestRepository,
    TomlInstallRecordRepository, TomlLockRepository,
};

use super::assemble::{AssembleOptions, AssembleResult, AssembleUseCase, EnvOptions, IMAGE_DIR};
use super::stage::{StageOptions, StageResult, StageUseCase};

/// Everything a build needs, with paths resolved against the project root
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub project_root: PathBuf,
    pub project_name: String,
    pub requirements: Vec<Requirement>,
    pub lock_path: PathBuf,
    pub index_dir: PathBuf,
    /// Relative to `project_root`
    pub source_paths: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub tooling: Vec<PackageName>,
    pub entry: EntryPoint,
    pub env: EnvOptions,
    pub startup_timeout: Option<Duration>,
}

impl BuildSettings {
    pub fn from_config(config: &Config, project_root: &Path) -> BerthResult<Self> {
        Ok(Self {
            project_root: project_root.to_path_buf(),
            project_name: config.project_name(project_root),
            requirements: config.requirements(project_root)?,
            lock_path: Config::resolve(project_root, &config.build.lock),
            index_dir: Config::resolve(project_root, &config.build.index),
            source_paths: config.build.source.clone(),
            output_dir: Config::resolve(project_root, &config.build.output),
            tooling: config.tooling(project_root)?,
            entry: config.entry_point(),
            env: config.env_options(),
            startup_timeout: config.startup_timeout(),
        })
    }

    pub fn image_dir(&self) -> PathBuf {
        self.output_dir.join(IMAGE_DIR)
    }

    fn stage_options(&self) -> StageOptions {
        StageOptions::new(&self.lock_path, &self.output_dir)
            .with_requirements(self.requirements.clone())
            .with_no_cache(self.env.no_cache)
    }

    fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions::new(&self.project_root, &self.output_dir)
            .with_project_name(&self.project_name)
            .with_source_paths(self.source_paths.clone())
            .with_tooling(self.tooling.clone())
            .with_entry(self.entry.clone())
            .with_env(self.env)
    }
}

/// Both stages of a build
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub stage: StageResult,
    pub image: AssembleResult,
}

/// Stage and assemble against the local file system
pub struct BuildPipeline {
    settings: BuildSettings,
    event_sink: Arc<dyn BuildEventSink>,
    cancel: Arc<AtomicBool>,
}

impl BuildPipeline {
    pub fn new(settings: BuildSettings) -> Self {
        Self {
            settings,
            event_sink: Arc::new(NoopEventSink),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_event_sink(mut self, event_sink: Arc<dyn BuildEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Dependency stager only
    pub fn stage(&self) -> BerthResult<StageResult> {
        let _lock = BuildLock::acquire(&self.settings.output_dir)?;
        self.run_stage()
    }

    /// Runtime assembler only; needs a previous stage
    pub fn assemble(&self) -> BerthResult<AssembleResult> {
        let _lock = BuildLock::acquire(&self.settings.output_dir)?;
        self.run_assemble()
    }

    /// Stage, then assemble, under one lock
    ///
    /// A cancellation during assembly also removes the stage this build
    /// just published, so a cancelled build leaves neither behind.
    pub fn build(&self) -> BerthResult<BuildResult> {
        let _lock = BuildLock::acquire(&self.settings.output_dir)?;
        let stage = self.run_stage()?;
        let image = match self.run_assemble() {
            Ok(image) => image,
            Err(BerthError::Cancelled) => {
                warn!(stage = %stage.stage_dir.display(), "build cancelled, removing stage");
                LocalFs::new()
                    .remove_dir_all(&stage.stage_dir)
                    .map_err(FsError::into_io)?;
                return Err(BerthError::Cancelled);
            }
            Err(e) => return Err(e),
        };
        Ok(BuildResult { stage, image })
    }

    fn run_stage(&self) -> BerthResult<StageResult> {
        StageUseCase::new(
            TomlLockRepository::new(),
            LocalPackageIndex::new(&self.settings.index_dir),
            TomlInstallRecordRepository::new(),
            LocalFs::new(),
        )
        .with_cancel_flag(self.cancel.clone())
        .execute_with_events(&self.settings.stage_options(), self.event_sink.clone())
    }

    fn run_assemble(&self) -> BerthResult<AssembleResult> {
        AssembleUseCase::new(
            TomlInstallRecordRepository::new(),
            TomlImageManifestRepository::new(),
            LocalFs::new(),
        )
        .with_cancel_flag(self.cancel.clone())
        .execute_with_events(&self.settings.assemble_options(), self.event_sink.clone())
    }
}
