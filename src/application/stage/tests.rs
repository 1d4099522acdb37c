//! Stage Use Case Tests

use super::*;
use crate::domain::entities::Requirement;
use crate::domain::ports::build_events::testing::RecordingEventSink;
use crate::domain::ports::{BuildEvent, FileSystem, PackageSource};
use crate::error::{BerthError, DependencyResolutionError};
use crate::infrastructure::{
    LocalFs, LocalPackageIndex, TomlInstallRecordRepository, TomlLockRepository,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

struct Fixture {
    dir: TempDir,
    locked: Vec<(String, String, String, Vec<String>)>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempdir().unwrap(),
            locked: Vec::new(),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn index(&self) -> PathBuf {
        self.root().join("wheelhouse")
    }

    fn output(&self) -> PathBuf {
        self.root().join("build")
    }

    fn lock_path(&self) -> PathBuf {
        self.root().join("berth.lock")
    }

    /// Add a distribution to the index and lock it with its real digest.
    fn package(mut self, name: &str, version: &str, files: &[(&str, &str)]) -> Self {
        let dist = self.index().join(name).join(version);
        for (rel, content) in files {
            let path = dist.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let hash = LocalFs::new().tree_digest(&dist).unwrap().to_string();
        self.locked
            .push((name.to_string(), version.to_string(), hash, Vec::new()));
        self
    }

    fn write_lock(&self) {
        let mut content = String::from("version = 1\n");
        for (name, version, hash, deps) in &self.locked {
            content.push_str(&format!(
                "\n[[package]]\nname = \"{name}\"\nversion = \"{version}\"\nhash = \"{hash}\"\ndependencies = {deps:?}\n"
            ));
        }
        fs::write(self.lock_path(), content).unwrap();
    }

    fn use_case(
        &self,
    ) -> StageUseCase<TomlLockRepository, LocalPackageIndex, TomlInstallRecordRepository, LocalFs>
    {
        StageUseCase::new(
            TomlLockRepository::new(),
            LocalPackageIndex::new(self.index()),
            TomlInstallRecordRepository::new(),
            LocalFs::new(),
        )
    }

    fn options(&self) -> StageOptions {
        StageOptions::new(self.lock_path(), self.output())
    }
}

fn starlette_fixture() -> Fixture {
    let fixture = Fixture::new()
        .package(
            "starlette",
            "0.46.2",
            &[
                ("starlette/__init__.py", "__version__ = '0.46.2'\n"),
                ("starlette/routing.py", "class Route: ...\n"),
            ],
        )
        .package("anyio", "4.9.0", &[("anyio/__init__.py", "")])
        .package("sniffio", "1.3.1", &[("sniffio/__init__.py", "")]);
    fixture.write_lock();
    fixture
}

fn leftover_temp_dirs(output: &Path) -> Vec<String> {
    fs::read_dir(output)
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().to_string())
                .filter(|n| n.starts_with(".stage-") || n.starts_with(".berth-cache-"))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn stages_every_locked_package() {
    let fixture = starlette_fixture();

    let result = fixture.use_case().execute(&fixture.options()).unwrap();

    assert_eq!(result.installed.len(), 3);
    assert_eq!(result.fetched, 3);
    assert_eq!(result.cache_hits, 0);
    let names: Vec<_> = result
        .installed
        .packages()
        .iter()
        .map(|p| p.name().as_str().to_string())
        .collect();
    assert_eq!(names, vec!["anyio", "sniffio", "starlette"]);

    let site = result.stage_dir.join("site-packages");
    assert!(site.join("starlette/routing.py").is_file());
    assert!(site.join("anyio/__init__.py").is_file());
    assert!(result.stage_dir.join("installed.toml").is_file());
    assert!(leftover_temp_dirs(&fixture.output()).is_empty());
}

#[test]
fn repeated_staging_is_byte_identical() {
    let fixture = starlette_fixture();
    let use_case = fixture.use_case();

    let first = use_case.execute(&fixture.options()).unwrap();
    let record_a = fs::read(first.stage_dir.join("installed.toml")).unwrap();
    let digest_a = LocalFs::new().tree_digest(&first.stage_dir).unwrap();

    let second = use_case.execute(&fixture.options()).unwrap();
    let record_b = fs::read(second.stage_dir.join("installed.toml")).unwrap();
    let digest_b = LocalFs::new().tree_digest(&second.stage_dir).unwrap();

    assert_eq!(record_a, record_b);
    assert_eq!(digest_a, digest_b);
}

#[test]
fn second_run_is_served_from_cache() {
    let fixture = starlette_fixture();
    let use_case = fixture.use_case();

    use_case.execute(&fixture.options()).unwrap();
    assert!(fixture.output().join(".cache/packages/anyio-4.9.0").is_dir());

    let sink = RecordingEventSink::new();
    let result = use_case
        .execute_with_events(&fixture.options(), Arc::new(sink.clone()))
        .unwrap();
    assert_eq!(result.cache_hits, 3);
    assert!(sink.take().iter().all(|e| !matches!(
        e,
        BuildEvent::PackageResolved {
            source: PackageSource::Index,
            ..
        }
    )));
}

#[test]
fn stale_cache_entry_is_refetched() {
    let fixture = starlette_fixture();
    let use_case = fixture.use_case();
    use_case.execute(&fixture.options()).unwrap();

    fs::write(
        fixture.output().join(".cache/packages/anyio-4.9.0/anyio/__init__.py"),
        "tampered",
    )
    .unwrap();

    let result = use_case.execute(&fixture.options()).unwrap();
    assert_eq!(result.cache_hits, 2);
    let installed = fs::read_to_string(result.stage_dir.join("site-packages/anyio/__init__.py"))
        .unwrap();
    assert_eq!(installed, "");
}

#[test]
fn no_cache_leaves_nothing_behind() {
    let fixture = starlette_fixture();

    let result = fixture
        .use_case()
        .execute(&fixture.options().with_no_cache(true))
        .unwrap();

    assert_eq!(result.installed.len(), 3);
    assert!(!fixture.output().join(".cache").exists());
    assert!(leftover_temp_dirs(&fixture.output()).is_empty());
}

#[test]
fn unavailable_version_fails_without_publishing() {
    let fixture = starlette_fixture();
    let mut lock = fs::read_to_string(fixture.lock_path()).unwrap();
    lock = lock.replace("version = \"4.9.0\"", "version = \"9.9.9\"");
    fs::write(fixture.lock_path(), lock).unwrap();

    let err = fixture.use_case().execute(&fixture.options()).unwrap_err();

    match err {
        BerthError::DependencyResolution(DependencyResolutionError::Unavailable {
            name,
            version,
            available,
            ..
        }) => {
            assert_eq!(name.as_str(), "anyio");
            assert_eq!(version, "9.9.9");
            assert_eq!(available, vec!["4.9.0"]);
        }
        other => panic!("expected Unavailable, got {other:?}"),
    }
    assert!(!fixture.output().join("stage").exists());
    assert!(leftover_temp_dirs(&fixture.output()).is_empty());
}

#[test]
fn failed_run_keeps_previous_stage() {
    let fixture = starlette_fixture();
    let use_case = fixture.use_case();
    use_case.execute(&fixture.options()).unwrap();

    fs::write(
        fixture.index().join("sniffio/1.3.1/sniffio/__init__.py"),
        "changed upstream",
    )
    .unwrap();
    // Force a refetch so the index copy is verified.
    fs::remove_dir_all(fixture.output().join(".cache")).unwrap();

    let err = use_case.execute(&fixture.options()).unwrap_err();
    assert!(matches!(
        err,
        BerthError::DependencyResolution(DependencyResolutionError::IntegrityMismatch { .. })
    ));
    assert!(fixture
        .output()
        .join("stage/site-packages/sniffio/__init__.py")
        .is_file());
}

#[test]
fn file_shipped_twice_is_a_conflict() {
    let fixture = Fixture::new()
        .package("alpha", "1.0", &[("shared/__init__.py", "a")])
        .package("beta", "1.0", &[("shared/__init__.py", "b")]);
    fixture.write_lock();

    let err = fixture.use_case().execute(&fixture.options()).unwrap_err();
    match err {
        BerthError::DependencyResolution(DependencyResolutionError::FileConflict {
            path,
            first,
            second,
        }) => {
            assert_eq!(path, "shared/__init__.py");
            assert_eq!(first.as_str(), "alpha");
            assert_eq!(second.as_str(), "beta");
        }
        other => panic!("expected FileConflict, got {other:?}"),
    }
}

#[test]
fn unlocked_requirement_is_rejected() {
    let fixture = starlette_fixture();
    let options = fixture.options().with_requirements(vec![
        Requirement::parse("starlette>=0.46").unwrap(),
        Requirement::parse("uvicorn[standard]").unwrap(),
    ]);

    let err = fixture.use_case().execute(&options).unwrap_err();
    match err {
        BerthError::DependencyResolution(DependencyResolutionError::NotLocked { requirement }) => {
            assert_eq!(requirement, "uvicorn[standard]");
        }
        other => panic!("expected NotLocked, got {other:?}"),
    }
}

#[test]
fn missing_lock_is_reported() {
    let fixture = Fixture::new();
    let err = fixture.use_case().execute(&fixture.options()).unwrap_err();
    assert!(matches!(
        err,
        BerthError::DependencyResolution(DependencyResolutionError::LockMissing { .. })
    ));
}

#[test]
fn cancellation_publishes_nothing() {
    let fixture = starlette_fixture();
    let cancel = Arc::new(AtomicBool::new(true));

    let err = fixture
        .use_case()
        .with_cancel_flag(cancel)
        .execute(&fixture.options())
        .unwrap_err();

    assert!(matches!(err, BerthError::Cancelled));
    assert!(!fixture.output().join("stage").exists());
    assert!(leftover_temp_dirs(&fixture.output()).is_empty());
}

#[test]
fn emits_events_in_order() {
    let fixture = starlette_fixture();
    let sink = RecordingEventSink::new();

    fixture
        .use_case()
        .execute_with_events(&fixture.options(), Arc::new(sink.clone()))
        .unwrap();

    let events = sink.take();
    assert!(matches!(
        events.first(),
        Some(BuildEvent::StageStarted {
            package_count: 3,
            ..
        })
    ));
    assert!(matches!(
        events.last(),
        Some(BuildEvent::StageCompleted {
            package_count: 3,
            file_count: 4,
            ..
        })
    ));
    let installed = events
        .iter()
        .filter(|e| matches!(e, BuildEvent::PackageInstalled { .. }))
        .count();
    assert_eq!(installed, 3);
}
