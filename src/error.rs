//! Error types for Berth
//!
//! One error enum per pipeline stage, wrapped by [`BerthError`]. Every stage
//! error is fatal to the build or launch that raised it.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::value_objects::{ContentHash, ModulePath, PackageName};

/// Result type alias for Berth operations
pub type BerthResult<T> = Result<T, BerthError>;

/// Main error type for Berth operations
#[derive(Error, Debug)]
pub enum BerthError {
    #[error(transparent)]
    DependencyResolution(#[from] DependencyResolutionError),

    #[error(transparent)]
    ArtifactCopy(#[from] ArtifactCopyError),

    #[error(transparent)]
    ProcessStartup(#[from] ProcessStartupError),

    /// Invalid `berth.toml` or user config
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Interrupted by the user; nothing was published
    #[error("build cancelled")]
    Cancelled,

    /// Another build holds the output directory lock
    #[error("another build is running in {path}")]
    BuildLocked { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BerthError {
    /// Stable identifier used in JSON error events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DependencyResolution(_) => "dependency_resolution",
            Self::ArtifactCopy(_) => "artifact_copy",
            Self::ProcessStartup(_) => "process_startup",
            Self::Config { .. } => "config",
            Self::Cancelled => "cancelled",
            Self::BuildLocked { .. } => "build_locked",
            Self::Io(_) => "io",
        }
    }
}

/// The lock descriptor cannot be turned into an installed package set.
#[derive(Error, Debug)]
pub enum DependencyResolutionError {
    #[error("lock file not found: {path}")]
    LockMissing { path: PathBuf },

    #[error("malformed lock file {path}: {message}")]
    LockMalformed { path: PathBuf, message: String },

    #[error("requirement '{requirement}' is not in the lock file; re-lock the project")]
    NotLocked { requirement: String },

    #[error("{name}=={version} is not available in package index {index}{}", available_hint(.available))]
    Unavailable {
        name: PackageName,
        version: String,
        index: PathBuf,
        available: Vec<String>,
    },

    #[error("{name}=={version} failed integrity check: lock has {expected}, index has {actual}")]
    IntegrityMismatch {
        name: PackageName,
        version: String,
        expected: ContentHash,
        actual: ContentHash,
    },

    #[error("'{path}' is shipped by both {first} and {second}")]
    FileConflict {
        path: String,
        first: PackageName,
        second: PackageName,
    },

    #[error("failed to install {name}: {source}")]
    InstallFailed {
        name: PackageName,
        #[source]
        source: std::io::Error,
    },
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available: {})", available.join(", "))
    }
}

/// An upstream artifact the assembler needs is absent or unreadable.
#[derive(Error, Debug)]
pub enum ArtifactCopyError {
    #[error("missing {artifact}: {path}")]
    MissingArtifact { artifact: &'static str, path: PathBuf },

    #[error("corrupt {artifact} at {path}: {message}")]
    CorruptArtifact {
        artifact: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("failed to copy {path}: {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The entry point could not be brought up.
#[derive(Error, Debug)]
pub enum ProcessStartupError {
    #[error("not a valid runtime image: {path}: {message}")]
    InvalidImage { path: PathBuf, message: String },

    #[error("module '{module}' not found under {app_root}")]
    ModuleNotFound { module: ModulePath, app_root: PathBuf },

    #[error("port {port} is already in use")]
    PortInUse {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start '{interpreter}': {source}")]
    SpawnFailed {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },

    #[error("process exited during startup ({})", exit_description(.code))]
    ExitedDuringStartup { code: Option<i32> },

    #[error("process did not accept connections on port {port} within {timeout:?}")]
    NotReady { port: u16, timeout: Duration },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_lists_known_versions() {
        let err = DependencyResolutionError::Unavailable {
            name: PackageName::new("starlette").unwrap(),
            version: "9.9.9".to_string(),
            index: PathBuf::from("wheelhouse"),
            available: vec!["0.46.1".to_string(), "0.46.2".to_string()],
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"starlette==9.9.9 is not available in package index wheelhouse (available: 0.46.1, 0.46.2)"
        );
    }

    #[test]
    fn unavailable_without_versions_has_no_hint() {
        let err = DependencyResolutionError::Unavailable {
            name: PackageName::new("ghost").unwrap(),
            version: "1.0".to_string(),
            index: PathBuf::from("wheelhouse"),
            available: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "ghost==1.0 is not available in package index wheelhouse"
        );
    }

    #[test]
    fn stage_errors_are_transparent() {
        let err: BerthError = ArtifactCopyError::MissingArtifact {
            artifact: "source tree",
            path: PathBuf::from("src"),
        }
        .into();
        assert_eq!(err.to_string(), "missing source tree: src");
        assert_eq!(err.kind(), "artifact_copy");
    }

    #[test]
    fn exited_during_startup_reports_code() {
        let err = ProcessStartupError::ExitedDuringStartup { code: Some(3) };
        assert_eq!(err.to_string(), "process exited during startup (exit code 3)");
        let err = ProcessStartupError::ExitedDuringStartup { code: None };
        assert_eq!(
            err.to_string(),
            "process exited during startup (terminated by signal)"
        );
    }
}
