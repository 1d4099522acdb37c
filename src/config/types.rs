//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::assemble::EnvOptions;
use crate::domain::entities::{EntryPoint, Requirement};
use crate::domain::value_objects::{ModulePath, PackageName};
use crate::error::{BerthError, BerthResult};

use super::loader::{self, ConfigWarning};

/// Project manifest file name
pub const MANIFEST_FILE: &str = "berth.toml";

/// Packages that are build-only unless the project says otherwise
pub const DEFAULT_TOOLING: &[&str] = &["pip", "setuptools", "wheel", "uv"];

/// `[project]`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub name: String,

    /// Requirement strings such as `"starlette>=0.46"`
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// `[build]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_index")]
    pub index: PathBuf,

    #[serde(default = "default_lock")]
    pub lock: PathBuf,

    #[serde(default = "default_source")]
    pub source: Vec<PathBuf>,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default = "default_tooling")]
    pub tooling: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
            lock: default_lock(),
            source: default_source(),
            output: default_output(),
            tooling: default_tooling(),
        }
    }
}

fn default_index() -> PathBuf {
    PathBuf::from("wheelhouse")
}

fn default_lock() -> PathBuf {
    PathBuf::from("berth.lock")
}

fn default_source() -> Vec<PathBuf> {
    vec![PathBuf::from("src")]
}

fn default_output() -> PathBuf {
    PathBuf::from("build")
}

fn default_tooling() -> Vec<String> {
    DEFAULT_TOOLING.iter().map(|s| s.to_string()).collect()
}

/// `[runtime]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub module: ModulePath,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Seconds to wait for the port to accept connections; 0 disables the wait
    #[serde(default = "default_startup_timeout")]
    pub startup_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            module: ModulePath::default(),
            port: default_port(),
            interpreter: default_interpreter(),
            startup_timeout_secs: default_startup_timeout(),
        }
    }
}

fn default_port() -> u16 {
    8000
}

fn default_interpreter() -> String {
    "python3".to_string()
}

fn default_startup_timeout() -> u64 {
    30
}

/// `[env]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnvConfig {
    #[serde(default = "default_true")]
    pub unbuffered: bool,

    #[serde(default = "default_true")]
    pub no_cache: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            unbuffered: true,
            no_cache: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Values given on the command line; `None` leaves the layered value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub interpreter: Option<String>,
    pub index: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub no_cache: Option<bool>,
    pub unbuffered: Option<bool>,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub env: EnvConfig,
}

impl Config {
    /// Load a single TOML file, ignoring the rest of the hierarchy.
    pub fn load(path: &Path) -> BerthResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load a single file and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> BerthResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Layer user config, `berth.toml` and `BERTH_*` variables.
    pub fn load_for_project(project_root: &Path) -> BerthResult<(Self, Vec<ConfigWarning>)> {
        let (config, warnings) =
            loader::load_layered(project_root, crate::infrastructure::fs::berth_config_dir())?;
        Ok((config.with_env_overrides(), warnings))
    }

    /// Apply environment variable overrides (BERTH_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Apply command-line overrides, the highest layer.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(port) = overrides.port {
            self.runtime.port = port;
        }
        if let Some(interpreter) = &overrides.interpreter {
            self.runtime.interpreter = interpreter.clone();
        }
        if let Some(index) = &overrides.index {
            self.build.index = index.clone();
        }
        if let Some(output) = &overrides.output {
            self.build.output = output.clone();
        }
        if let Some(no_cache) = overrides.no_cache {
            self.env.no_cache = no_cache;
        }
        if let Some(unbuffered) = overrides.unbuffered {
            self.env.unbuffered = unbuffered;
        }
        self
    }

    /// Project name, falling back to the project directory name.
    pub fn project_name(&self, project_root: &Path) -> String {
        if !self.project.name.trim().is_empty() {
            return self.project.name.trim().to_string();
        }
        project_root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "app".to_string())
    }

    /// Parsed `[project].dependencies`.
    pub fn requirements(&self, project_root: &Path) -> BerthResult<Vec<Requirement>> {
        self.project
            .dependencies
            .iter()
            .map(|raw| {
                Requirement::parse(raw).map_err(|e| BerthError::Config {
                    file: project_root.join(MANIFEST_FILE),
                    message: format!("dependency '{}': {}", raw, e),
                })
            })
            .collect()
    }

    /// Parsed `[build].tooling`.
    pub fn tooling(&self, project_root: &Path) -> BerthResult<Vec<PackageName>> {
        self.build
            .tooling
            .iter()
            .map(|raw| {
                PackageName::new(raw).map_err(|e| BerthError::Config {
                    file: project_root.join(MANIFEST_FILE),
                    message: format!("tooling '{}': {}", raw, e),
                })
            })
            .collect()
    }

    pub fn entry_point(&self) -> EntryPoint {
        EntryPoint {
            module: self.runtime.module.clone(),
            port: self.runtime.port,
            interpreter: self.runtime.interpreter.clone(),
        }
    }

    pub fn env_options(&self) -> EnvOptions {
        EnvOptions {
            unbuffered: self.env.unbuffered,
            no_cache: self.env.no_cache,
        }
    }

    /// `None` when readiness waiting is disabled.
    pub fn startup_timeout(&self) -> Option<Duration> {
        match self.runtime.startup_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Resolve a configured path against the project root.
    pub fn resolve(project_root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_root.join(path)
        }
    }
}
