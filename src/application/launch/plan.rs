//! Launch plan: everything needed to start the entry point, resolved from
//! an image directory before any process is spawned.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::entities::{ImageManifest, APP_DIR, IMAGE_MANIFEST_FILE, SITE_PACKAGES_DIR};
use crate::domain::ports::{ImageManifestRepository, RecordError};
use crate::domain::value_objects::ModulePath;
use crate::error::ProcessStartupError;

/// A fully resolved entry point invocation
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub image_dir: PathBuf,
    pub app_dir: PathBuf,
    pub module: ModulePath,
    /// File under `app_dir` that `-m <module>` resolves to
    pub module_file: PathBuf,
    pub interpreter: String,
    pub port: u16,
    /// Complete child environment additions, including `PYTHONPATH` and `PORT`
    pub env: BTreeMap<String, String>,
}

impl LaunchPlan {
    /// Load the manifest of `image_dir` and resolve the entry module.
    pub fn prepare<MR: ImageManifestRepository>(
        manifest_repo: &MR,
        image_dir: &Path,
    ) -> Result<Self, ProcessStartupError> {
        let manifest_path = image_dir.join(IMAGE_MANIFEST_FILE);
        let manifest = manifest_repo
            .load(&manifest_path)
            .map_err(|e| ProcessStartupError::InvalidImage {
                path: image_dir.to_path_buf(),
                message: match e {
                    RecordError::NotFound => format!("{} is missing", IMAGE_MANIFEST_FILE),
                    other => other.to_string(),
                },
            })?;

        Self::from_manifest(image_dir, manifest)
    }

    fn from_manifest(image_dir: &Path, manifest: ImageManifest) -> Result<Self, ProcessStartupError> {
        let site_packages = image_dir.join(SITE_PACKAGES_DIR);
        let app_dir = image_dir.join(APP_DIR);
        for dir in [&site_packages, &app_dir] {
            if !dir.is_dir() {
                return Err(ProcessStartupError::InvalidImage {
                    path: image_dir.to_path_buf(),
                    message: format!("{} is missing", dir.display()),
                });
            }
        }

        let module = manifest.entry.module;
        let module_file = module
            .candidate_files()
            .into_iter()
            .find(|candidate| app_dir.join(candidate).is_file())
            .ok_or_else(|| ProcessStartupError::ModuleNotFound {
                module: module.clone(),
                app_root: app_dir.clone(),
            })?;

        let port = manifest.entry.port;
        let mut env = manifest.env;
        env.insert(
            "PYTHONPATH".to_string(),
            site_packages.to_string_lossy().into_owned(),
        );
        env.insert("PORT".to_string(), port.to_string());

        Ok(Self {
            image_dir: image_dir.to_path_buf(),
            app_dir,
            module,
            module_file,
            interpreter: manifest.entry.interpreter,
            port,
            env,
        })
    }

    /// Arguments passed to the interpreter. Nothing but the module.
    pub fn args(&self) -> [OsString; 2] {
        [OsString::from("-m"), OsString::from(self.module.as_str())]
    }

    /// The child command, not yet spawned.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.interpreter);
        command
            .args(self.args())
            .current_dir(&self.app_dir)
            .envs(&self.env);
        command
    }
}
