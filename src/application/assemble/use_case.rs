//! Assemble Use Case
//!
//! Orchestrates image assembly:
//! 1. Load the install record and check every source path exists
//! 2. Copy non-tooling package files into a temporary image directory
//! 3. Copy the source tree into `app/`, honoring ignore patterns
//! 4. Write `berth-image.toml` last
//! 5. Replace `<output>/image` with the temporary directory

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::stage::{INSTALL_RECORD_FILE, STAGE_DIR};
use crate::domain::entities::{
    ImageManifest, ImagePackage, APP_DIR, IMAGE_MANIFEST_FILE, SITE_PACKAGES_DIR,
};
use crate::domain::ports::{
    BuildEvent, BuildEventSink, FileSystem, FsError, ImageManifestRepository,
    InstallRecordRepository, NoopEventSink, RecordError,
};
use crate::domain::value_objects::{IgnorePatterns, IGNORE_FILE_NAME};
use crate::error::{ArtifactCopyError, BerthError, BerthResult};

use super::options::AssembleOptions;
use super::result::AssembleResult;

/// Assemble use case - builds the runtime image
pub struct AssembleUseCase<RR, MR, FS>
where
    RR: InstallRecordRepository,
    MR: ImageManifestRepository,
    FS: FileSystem,
{
    record_repo: RR,
    manifest_repo: MR,
    file_system: FS,
    cancel: Arc<AtomicBool>,
}

impl<RR, MR, FS> AssembleUseCase<RR, MR, FS>
where
    RR: InstallRecordRepository,
    MR: ImageManifestRepository,
    FS: FileSystem,
{
    pub fn new(record_repo: RR, manifest_repo: MR, file_system: FS) -> Self {
        Self {
            record_repo,
            manifest_repo,
            file_system,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a cancellation flag; it is checked between files.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Execute the assemble use case
    pub fn execute(&self, options: &AssembleOptions) -> BerthResult<AssembleResult> {
        self.execute_with_events(options, Arc::new(NoopEventSink))
    }

    /// Execute the assemble use case with event reporting
    pub fn execute_with_events(
        &self,
        options: &AssembleOptions,
        event_sink: Arc<dyn BuildEventSink>,
    ) -> BerthResult<AssembleResult> {
        let stage_dir = options.output_dir.join(STAGE_DIR);
        let record_path = stage_dir.join(INSTALL_RECORD_FILE);
        let installed = self
            .record_repo
            .load(&record_path)
            .map_err(|e| match e {
                RecordError::NotFound => ArtifactCopyError::MissingArtifact {
                    artifact: "installed package set",
                    path: record_path.clone(),
                },
                RecordError::InvalidFormat(message) => ArtifactCopyError::CorruptArtifact {
                    artifact: "installed package set",
                    path: record_path.clone(),
                    message,
                },
                RecordError::Io(source) => ArtifactCopyError::CopyFailed {
                    path: record_path.clone(),
                    source,
                },
            })?;

        for source in &options.source_paths {
            if source.has_root() {
                return Err(BerthError::Config {
                    file: options.project_root.clone(),
                    message: format!(
                        "source path '{}' must be relative to the project root",
                        source.display()
                    ),
                });
            }
            let full = options.project_root.join(source);
            if !self.file_system.exists(&full) {
                return Err(ArtifactCopyError::MissingArtifact {
                    artifact: "source tree",
                    path: full,
                }
                .into());
            }
        }

        let ignore = IgnorePatterns::load(&options.project_root).map_err(|e| {
            BerthError::Config {
                file: options.project_root.join(IGNORE_FILE_NAME),
                message: e.to_string(),
            }
        })?;

        let image_dir = options.image_dir();
        event_sink.on_event(BuildEvent::AssembleStarted {
            image_dir: image_dir.clone(),
        });

        let staging = tempfile::Builder::new()
            .prefix(".image-")
            .tempdir_in(&options.output_dir)?;
        let site_dst = staging.path().join(SITE_PACKAGES_DIR);
        let app_dst = staging.path().join(APP_DIR);
        self.create_dir(&site_dst)?;
        self.create_dir(&app_dst)?;

        // Packages, driven by the install record rather than a directory scan
        let site_src = stage_dir.join(SITE_PACKAGES_DIR);
        let mut packages = Vec::new();
        let mut excluded = Vec::new();
        let mut package_file_count = 0;
        for package in installed.packages() {
            if options.is_tooling(package.name()) {
                debug!(package = %package.name(), "tooling excluded");
                event_sink.on_event(BuildEvent::ToolingExcluded {
                    name: package.name().clone(),
                });
                excluded.push(package.name().clone());
                continue;
            }
            for file in package.files() {
                self.check_cancelled()?;
                self.copy(&site_src.join(file), &site_dst.join(file))?;
            }
            package_file_count += package.files().len();
            packages.push(ImagePackage {
                name: package.name().clone(),
                version: package.version().to_string(),
            });
        }

        let source_file_count = self.copy_sources(options, &ignore, &app_dst)?;
        self.check_cancelled()?;

        let manifest = ImageManifest {
            project: options.project_name.clone(),
            entry: options.entry.clone(),
            env: options.env.variables(),
            packages,
            site_packages_digest: self.digest(&site_dst)?,
            app_digest: self.digest(&app_dst)?,
        };

        let manifest_path = staging.path().join(IMAGE_MANIFEST_FILE);
        self.manifest_repo
            .save(&manifest, &manifest_path)
            .map_err(|e| ArtifactCopyError::CopyFailed {
                path: manifest_path.clone(),
                source: match e {
                    RecordError::Io(source) => source,
                    other => std::io::Error::other(other.to_string()),
                },
            })?;

        self.file_system
            .remove_dir_all(&image_dir)
            .map_err(copy_failed)?;
        self.file_system
            .rename(staging.path(), &image_dir)
            .map_err(copy_failed)?;

        info!(
            image = %image_dir.display(),
            packages = manifest.packages.len(),
            excluded = excluded.len(),
            source_files = source_file_count,
            "image published"
        );
        event_sink.on_event(BuildEvent::AssembleCompleted {
            image_dir: image_dir.clone(),
            package_count: manifest.packages.len(),
            source_file_count,
        });

        Ok(AssembleResult {
            image_dir,
            manifest,
            excluded,
            source_file_count,
            package_file_count,
        })
    }

    /// Copy every configured source path under `app_dst`, keeping its
    /// project-relative location.
    fn copy_sources(
        &self,
        options: &AssembleOptions,
        ignore: &IgnorePatterns,
        app_dst: &Path,
    ) -> BerthResult<usize> {
        let mut copied = 0;
        for source in &options.source_paths {
            let full = options.project_root.join(source);

            let files: Vec<PathBuf> = if self.file_system.is_dir(&full) {
                self.file_system
                    .list_files(&full)
                    .map_err(copy_failed)?
                    .into_iter()
                    .map(|rel| source.join(rel))
                    .collect()
            } else {
                vec![source.clone()]
            };

            for rel in files {
                self.check_cancelled()?;
                let from = options.project_root.join(&rel);
                if from.starts_with(&options.output_dir) || ignore.is_ignored(&rel, false) {
                    continue;
                }
                self.copy(&from, &app_dst.join(&rel))?;
                copied += 1;
            }
        }
        Ok(copied)
    }

    fn copy(&self, from: &Path, to: &Path) -> BerthResult<()> {
        self.file_system
            .copy_file(from, to)
            .map_err(|e| copy_failed(e).into())
    }

    fn digest(&self, dir: &Path) -> BerthResult<crate::domain::value_objects::ContentHash> {
        self.file_system
            .tree_digest(dir)
            .map_err(|e| copy_failed(e).into())
    }

    fn create_dir(&self, path: &Path) -> BerthResult<()> {
        self.file_system
            .create_dir_all(path)
            .map_err(|e| copy_failed(e).into())
    }

    fn check_cancelled(&self) -> BerthResult<()> {
        if self.cancel.load(Ordering::SeqCst) {
            Err(BerthError::Cancelled)
        } else {
            Ok(())
        }
    }
}

fn copy_failed(err: FsError) -> ArtifactCopyError {
    ArtifactCopyError::CopyFailed {
        path: err.path().to_path_buf(),
        source: err.into_io(),
    }
}
