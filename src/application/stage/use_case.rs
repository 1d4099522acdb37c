//! Stage Use Case
//!
//! Orchestrates dependency staging:
//! 1. Load and validate the lock descriptor
//! 2. Check every manifest requirement is locked
//! 3. Resolve each package from the cache or the index, verifying its digest
//! 4. Install package files into a temporary staging directory
//! 5. Write the install record and publish the directory as `<output>/stage`
//!
//! Nothing under `<output>/stage` changes unless every step succeeds.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{
    normalize_record_path, InstalledPackage, InstalledPackageSet, LockViolation, LockedPackage,
    SITE_PACKAGES_DIR,
};
use crate::domain::ports::{
    BuildEvent, BuildEventSink, FileSystem, FsError, IndexError, InstallRecordRepository,
    LockRepository, NoopEventSink, PackageIndex, PackageSource, RecordError,
};
use crate::domain::value_objects::PackageName;
use crate::error::{BerthError, BerthResult, DependencyResolutionError};

use super::options::{StageOptions, INSTALL_RECORD_FILE};
use super::result::StageResult;

/// Stage use case - installs the locked package set
pub struct StageUseCase<LR, IX, RR, FS>
where
    LR: LockRepository,
    IX: PackageIndex,
    RR: InstallRecordRepository,
    FS: FileSystem,
{
    lock_repo: LR,
    index: IX,
    record_repo: RR,
    file_system: FS,
    cancel: Arc<AtomicBool>,
}

impl<LR, IX, RR, FS> StageUseCase<LR, IX, RR, FS>
where
    LR: LockRepository,
    IX: PackageIndex,
    RR: InstallRecordRepository,
    FS: FileSystem,
{
    pub fn new(lock_repo: LR, index: IX, record_repo: RR, file_system: FS) -> Self {
        Self {
            lock_repo,
            index,
            record_repo,
            file_system,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a cancellation flag; it is checked between packages and files.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Execute the stage use case
    pub fn execute(&self, options: &StageOptions) -> BerthResult<StageResult> {
        self.execute_with_events(options, Arc::new(NoopEventSink))
    }

    /// Execute the stage use case with event reporting
    pub fn execute_with_events(
        &self,
        options: &StageOptions,
        event_sink: Arc<dyn BuildEventSink>,
    ) -> BerthResult<StageResult> {
        let lock = self.lock_repo.load(&options.lock_path)?;
        lock.check_requirements(&options.requirements)
            .map_err(|violation| match violation {
                LockViolation::NotLocked(requirement) => {
                    DependencyResolutionError::NotLocked { requirement }
                }
                other => DependencyResolutionError::LockMalformed {
                    path: options.lock_path.clone(),
                    message: other.to_string(),
                },
            })?;

        event_sink.on_event(BuildEvent::StageStarted {
            lock: options.lock_path.clone(),
            package_count: lock.len(),
        });

        self.create_dir(&options.output_dir)?;

        // A throwaway cache is removed when `_scratch_cache` drops.
        let (cache_root, _scratch_cache) = if options.no_cache {
            let scratch = tempfile::Builder::new()
                .prefix(".berth-cache-")
                .tempdir_in(&options.output_dir)?;
            (scratch.path().to_path_buf(), Some(scratch))
        } else {
            (options.cache_dir(), None)
        };

        let staging = tempfile::Builder::new()
            .prefix(".stage-")
            .tempdir_in(&options.output_dir)?;
        let site_packages = staging.path().join(SITE_PACKAGES_DIR);
        self.create_dir(&site_packages)?;

        let mut owners: HashMap<String, PackageName> = HashMap::new();
        let mut installed = Vec::with_capacity(lock.len());
        let mut cache_hits = 0;

        for package in lock.packages() {
            self.check_cancelled()?;

            let (dist, source) = self.resolve(package, &cache_root)?;
            if source == PackageSource::Cache {
                cache_hits += 1;
            }
            if event_sink.wants_detailed_events() {
                event_sink.on_event(BuildEvent::PackageResolved {
                    name: package.name().clone(),
                    version: package.version().to_string(),
                    source,
                });
            }

            let files = self.install(package, &dist, &site_packages, &mut owners)?;
            if event_sink.wants_detailed_events() {
                event_sink.on_event(BuildEvent::PackageInstalled {
                    name: package.name().clone(),
                    version: package.version().to_string(),
                    file_count: files.len(),
                });
            }

            installed.push(InstalledPackage::new(
                package.name().clone(),
                package.version(),
                package.hash().clone(),
                files,
            ));
        }

        self.check_cancelled()?;

        let installed = InstalledPackageSet::new(installed);
        self.record_repo
            .save(&installed, &staging.path().join(INSTALL_RECORD_FILE))
            .map_err(record_to_io)?;

        let stage_dir = options.stage_dir();
        self.publish(staging.path(), &stage_dir)?;

        info!(
            stage = %stage_dir.display(),
            packages = installed.len(),
            files = installed.file_count(),
            cache_hits,
            "stage published"
        );
        event_sink.on_event(BuildEvent::StageCompleted {
            stage_dir: stage_dir.clone(),
            package_count: installed.len(),
            file_count: installed.file_count(),
        });

        let fetched = installed.len() - cache_hits;
        Ok(StageResult {
            stage_dir,
            installed,
            cache_hits,
            fetched,
        })
    }

    /// Find a verified copy of `package`, preferring the cache.
    fn resolve(
        &self,
        package: &LockedPackage,
        cache_root: &Path,
    ) -> BerthResult<(PathBuf, PackageSource)> {
        let cache_entry = cache_root.join(package.slug());

        if self.file_system.is_dir(&cache_entry) {
            match self.file_system.tree_digest(&cache_entry) {
                Ok(digest) if &digest == package.hash() => {
                    debug!(package = %package.name(), version = package.version(), "cache hit");
                    return Ok((cache_entry, PackageSource::Cache));
                }
                Ok(digest) => {
                    debug!(
                        package = %package.name(),
                        expected = %package.hash().short(),
                        actual = %digest.short(),
                        "stale cache entry"
                    );
                }
                Err(e) => debug!(package = %package.name(), error = %e, "unreadable cache entry"),
            }
        }

        let dist = self
            .index
            .locate(package.name(), package.version())
            .map_err(|e| match e {
                IndexError::NotFound { available } => DependencyResolutionError::Unavailable {
                    name: package.name().clone(),
                    version: package.version().to_string(),
                    index: self.index.root().to_path_buf(),
                    available,
                },
                IndexError::Io(source) => DependencyResolutionError::InstallFailed {
                    name: package.name().clone(),
                    source,
                },
            })?;

        let actual = self
            .file_system
            .tree_digest(&dist)
            .map_err(|e| install_failed(package.name(), e))?;
        if &actual != package.hash() {
            return Err(DependencyResolutionError::IntegrityMismatch {
                name: package.name().clone(),
                version: package.version().to_string(),
                expected: package.hash().clone(),
                actual,
            }
            .into());
        }

        // Cache population is best-effort: the digest is re-checked on every hit.
        let _ = self.file_system.remove_dir_all(&cache_entry);
        match self.file_system.copy_tree(&dist, &cache_entry) {
            Ok(_) => debug!(package = %package.name(), cache = %cache_entry.display(), "cached"),
            Err(e) => debug!(package = %package.name(), error = %e, "cache write failed"),
        }

        Ok((dist, PackageSource::Index))
    }

    /// Copy every file of a distribution into `site_packages`.
    fn install(
        &self,
        package: &LockedPackage,
        dist: &Path,
        site_packages: &Path,
        owners: &mut HashMap<String, PackageName>,
    ) -> BerthResult<Vec<String>> {
        let files = self
            .file_system
            .list_files(dist)
            .map_err(|e| install_failed(package.name(), e))?;

        let mut recorded = Vec::with_capacity(files.len());
        for rel in files {
            self.check_cancelled()?;

            let record = normalize_record_path(&rel);
            if let Some(first) = owners.get(&record) {
                return Err(DependencyResolutionError::FileConflict {
                    path: record,
                    first: first.clone(),
                    second: package.name().clone(),
                }
                .into());
            }

            self.file_system
                .copy_file(&dist.join(&rel), &site_packages.join(&rel))
                .map_err(|e| install_failed(package.name(), e))?;
            owners.insert(record.clone(), package.name().clone());
            recorded.push(record);
        }

        Ok(recorded)
    }

    fn publish(&self, staging: &Path, stage_dir: &Path) -> BerthResult<()> {
        self.file_system
            .remove_dir_all(stage_dir)
            .map_err(|e| BerthError::Io(e.into_io()))?;
        self.file_system
            .rename(staging, stage_dir)
            .map_err(|e| BerthError::Io(e.into_io()))
    }

    fn create_dir(&self, path: &Path) -> BerthResult<()> {
        self.file_system
            .create_dir_all(path)
            .map_err(|e| BerthError::Io(e.into_io()))
    }

    fn check_cancelled(&self) -> BerthResult<()> {
        if self.cancel.load(Ordering::SeqCst) {
            Err(BerthError::Cancelled)
        } else {
            Ok(())
        }
    }
}

fn install_failed(name: &PackageName, err: FsError) -> BerthError {
    DependencyResolutionError::InstallFailed {
        name: name.clone(),
        source: err.into_io(),
    }
    .into()
}

fn record_to_io(err: RecordError) -> BerthError {
    match err {
        RecordError::Io(e) => BerthError::Io(e),
        other => BerthError::Io(std::io::Error::other(other.to_string())),
    }
}
