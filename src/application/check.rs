//! Check Use Case
//!
//! Validates a project without writing anything: configuration, lock,
//! index availability and integrity, source paths and the entry module.
//! Unlike a build it keeps going after the first problem.

use std::path::Path;

use crate::config::ConfigWarning;
use crate::domain::ports::{FileSystem, IndexError, LockRepository, PackageIndex};
use crate::error::DependencyResolutionError;

use super::launch::probe_port;
use super::pipeline::BuildSettings;

/// Result of a single check
#[derive(Debug, Clone)]
pub struct CheckItem {
    /// Name of the check (e.g., "lock", "package starlette")
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    /// How to fix the problem
    pub recommendation: Option<String>,
    pub details: Vec<String>,
}

/// Status of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warning,
    Error,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Warning => "warning",
            CheckStatus::Error => "error",
        }
    }
}

/// Result of the check operation
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub items: Vec<CheckItem>,
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl CheckResult {
    /// No errors; warnings allowed
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }

    fn push(&mut self, item: CheckItem) {
        match item.status {
            CheckStatus::Pass => self.passed += 1,
            CheckStatus::Warning => self.warnings += 1,
            CheckStatus::Error => self.errors += 1,
        }
        self.items.push(item);
    }
}

fn item(name: impl Into<String>, status: CheckStatus, message: impl Into<String>) -> CheckItem {
    CheckItem {
        name: name.into(),
        status,
        message: message.into(),
        recommendation: None,
        details: Vec::new(),
    }
}

/// Check Use Case
pub struct CheckUseCase<LR, IX, FS>
where
    LR: LockRepository,
    IX: PackageIndex,
    FS: FileSystem,
{
    lock_repo: LR,
    index: IX,
    fs: FS,
}

impl<LR, IX, FS> CheckUseCase<LR, IX, FS>
where
    LR: LockRepository,
    IX: PackageIndex,
    FS: FileSystem,
{
    pub fn new(lock_repo: LR, index: IX, fs: FS) -> Self {
        Self {
            lock_repo,
            index,
            fs,
        }
    }

    /// Run every check; the callback sees each item as it is produced.
    pub fn execute_with_callback<F>(
        &self,
        settings: &BuildSettings,
        config_warnings: &[ConfigWarning],
        mut on_item: F,
    ) -> CheckResult
    where
        F: FnMut(&CheckItem),
    {
        let mut result = CheckResult::default();
        let mut emit = |result: &mut CheckResult, item: CheckItem| {
            on_item(&item);
            result.push(item);
        };

        for item in self.check_config(config_warnings) {
            emit(&mut result, item);
        }
        for item in self.check_dependencies(settings) {
            emit(&mut result, item);
        }
        for item in self.check_sources(settings) {
            emit(&mut result, item);
        }
        emit(&mut result, self.check_port(settings));

        tracing::debug!(
            passed = result.passed,
            warnings = result.warnings,
            errors = result.errors,
            "check finished"
        );
        result
    }

    pub fn execute(&self, settings: &BuildSettings, config_warnings: &[ConfigWarning]) -> CheckResult {
        self.execute_with_callback(settings, config_warnings, |_| {})
    }

    fn check_config(&self, warnings: &[ConfigWarning]) -> Vec<CheckItem> {
        if warnings.is_empty() {
            return vec![item("config", CheckStatus::Pass, "configuration is valid")];
        }

        warnings
            .iter()
            .map(|w| {
                let location = match w.line {
                    Some(line) => format!("{}:{}", w.file.display(), line),
                    None => w.file.display().to_string(),
                };
                let mut warning = item(
                    "config",
                    CheckStatus::Warning,
                    format!("unknown key '{}' in {}", w.key, location),
                );
                warning.recommendation = w
                    .suggestion
                    .as_ref()
                    .map(|s| format!("did you mean '{}'?", s));
                warning
            })
            .collect()
    }

    fn check_dependencies(&self, settings: &BuildSettings) -> Vec<CheckItem> {
        let mut items = Vec::new();

        let lock = match self.lock_repo.load(&settings.lock_path) {
            Ok(lock) => lock,
            Err(err) => {
                let mut failed = item("lock", CheckStatus::Error, err.to_string());
                if matches!(err, DependencyResolutionError::LockMissing { .. }) {
                    failed.recommendation =
                        Some("generate a lock file before building".to_string());
                }
                items.push(failed);
                return items;
            }
        };
        items.push(item(
            "lock",
            CheckStatus::Pass,
            format!("{} locked package(s)", lock.len()),
        ));

        match lock.check_requirements(&settings.requirements) {
            Ok(()) => items.push(item(
                "requirements",
                CheckStatus::Pass,
                format!("{} requirement(s) locked", settings.requirements.len()),
            )),
            Err(violation) => {
                let mut failed = item("requirements", CheckStatus::Error, violation.to_string());
                failed.recommendation = Some("re-lock the project dependencies".to_string());
                items.push(failed);
            }
        }

        let mut tooling = Vec::new();
        for package in lock.packages() {
            let name = format!("package {}", package.name());
            let pinned = format!("{}=={}", package.name(), package.version());
            if settings.tooling.contains(package.name()) {
                tooling.push(package.name().to_string());
            }

            let dir = match self.index.locate(package.name(), package.version()) {
                Ok(dir) => dir,
                Err(IndexError::NotFound { available }) => {
                    let mut failed = item(
                        name,
                        CheckStatus::Error,
                        format!("{} not found in {}", pinned, self.index.root().display()),
                    );
                    if !available.is_empty() {
                        failed
                            .details
                            .push(format!("available: {}", available.join(", ")));
                    }
                    items.push(failed);
                    continue;
                }
                Err(IndexError::Io(err)) => {
                    items.push(item(name, CheckStatus::Error, err.to_string()));
                    continue;
                }
            };

            match self.fs.tree_digest(&dir) {
                Ok(actual) if &actual == package.hash() => {
                    items.push(item(name, CheckStatus::Pass, format!("{} verified", pinned)));
                }
                Ok(actual) => {
                    let mut failed = item(
                        name,
                        CheckStatus::Error,
                        format!("{} does not match its locked hash", pinned),
                    );
                    failed.details.push(format!("expected {}", package.hash()));
                    failed.details.push(format!("actual   {}", actual));
                    items.push(failed);
                }
                Err(err) => items.push(item(name, CheckStatus::Error, err.to_string())),
            }
        }

        if !tooling.is_empty() {
            let mut note = item(
                "tooling",
                CheckStatus::Pass,
                format!("{} build-only package(s) left out of the image", tooling.len()),
            );
            note.details = tooling;
            items.push(note);
        }

        items
    }

    fn check_sources(&self, settings: &BuildSettings) -> Vec<CheckItem> {
        let mut items = Vec::new();
        let root = &settings.project_root;

        for source in &settings.source_paths {
            let name = format!("source {}", source.display());
            if source.is_absolute() {
                items.push(item(
                    name,
                    CheckStatus::Error,
                    "source paths must be relative to the project root",
                ));
            } else if self.fs.exists(&root.join(source)) {
                items.push(item(name, CheckStatus::Pass, "present"));
            } else {
                items.push(item(name, CheckStatus::Error, "missing"));
            }
        }

        let module = &settings.entry.module;
        let found = module.candidate_files().into_iter().find(|candidate| {
            settings
                .source_paths
                .iter()
                .any(|source| candidate.starts_with(source))
                && self.fs.exists(&root.join(candidate))
        });
        items.push(match found {
            Some(file) => item(
                "entry module",
                CheckStatus::Pass,
                format!("{} -> {}", module, file.display()),
            ),
            None => {
                let mut failed = item(
                    "entry module",
                    CheckStatus::Error,
                    format!("module '{}' is not inside the copied sources", module),
                );
                failed.details = module
                    .candidate_files()
                    .iter()
                    .map(|c| format!("looked for {}", c.display()))
                    .collect();
                failed
            }
        });

        items
    }

    fn check_port(&self, settings: &BuildSettings) -> CheckItem {
        let port = settings.entry.port;
        match probe_port(port) {
            Ok(()) => item("port", CheckStatus::Pass, format!("port {} is free", port)),
            Err(err) => {
                let mut busy = item("port", CheckStatus::Warning, err.to_string());
                busy.recommendation = Some("stop the other listener or pass --port".to_string());
                busy
            }
        }
    }
}
