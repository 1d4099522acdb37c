//! Assemble Options
//!
//! Configuration types for image assembly.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::entities::EntryPoint;
use crate::domain::value_objects::PackageName;

/// Published runtime image, under the output directory
pub const IMAGE_DIR: &str = "image";

/// Environment toggles baked into the image manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvOptions {
    /// Run the interpreter with unbuffered stdout/stderr
    pub unbuffered: bool,
    /// Tell any installer invoked at runtime not to cache
    pub no_cache: bool,
}

impl Default for EnvOptions {
    fn default() -> Self {
        Self {
            unbuffered: true,
            no_cache: true,
        }
    }
}

impl EnvOptions {
    /// Environment variables the entry point is started with.
    pub fn variables(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        if self.unbuffered {
            vars.insert("PYTHONUNBUFFERED".to_string(), "1".to_string());
        }
        if self.no_cache {
            vars.insert("PIP_NO_CACHE_DIR".to_string(), "1".to_string());
        }
        vars
    }
}

/// Options for the assemble use case
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Recorded in the image manifest
    pub project_name: String,
    /// Source paths are resolved against this directory
    pub project_root: PathBuf,
    /// Source paths copied into `app/`, relative to the project root
    pub source_paths: Vec<PathBuf>,
    /// Build output directory holding `stage/`
    pub output_dir: PathBuf,
    /// Locked packages left out of the image
    pub tooling: Vec<PackageName>,
    pub entry: EntryPoint,
    pub env: EnvOptions,
}

impl AssembleOptions {
    pub fn new(project_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_name: String::new(),
            project_root: project_root.into(),
            source_paths: vec![PathBuf::from("src")],
            output_dir: output_dir.into(),
            tooling: Vec::new(),
            entry: EntryPoint::default(),
            env: EnvOptions::default(),
        }
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    pub fn with_source_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.source_paths = paths;
        self
    }

    pub fn with_tooling(mut self, tooling: Vec<PackageName>) -> Self {
        self.tooling = tooling;
        self
    }

    pub fn with_entry(mut self, entry: EntryPoint) -> Self {
        self.entry = entry;
        self
    }

    pub fn with_env(mut self, env: EnvOptions) -> Self {
        self.env = env;
        self
    }

    pub fn image_dir(&self) -> PathBuf {
        self.output_dir.join(IMAGE_DIR)
    }

    pub fn is_tooling(&self, name: &PackageName) -> bool {
        self.tooling.contains(name)
    }
}
