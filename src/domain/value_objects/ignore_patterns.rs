//! Source ignore patterns
//!
//! Loads `.berthignore` from the project root using gitignore semantics.
//! Bytecode caches are always excluded from the runtime image, whether or not
//! the project lists them.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// File name looked up in the project root.
pub const IGNORE_FILE_NAME: &str = ".berthignore";

const MAX_FILE_SIZE: u64 = 64 * 1024;
const MAX_PATTERNS: usize = 1000;

/// Patterns applied to every source tree.
const BUILTIN_PATTERNS: &[&str] = &["__pycache__/", "*.pyc", "*.pyo", ".DS_Store"];

#[derive(Debug, thiserror::Error)]
pub enum IgnoreError {
    #[error("{path} is {size} bytes, over the {limit} byte limit")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("{path} has more than {limit} patterns")]
    TooManyPatterns { path: PathBuf, limit: usize },

    #[error("invalid pattern '{pattern}' at {path}:{line}: {message}")]
    InvalidPattern {
        path: PathBuf,
        line: usize,
        pattern: String,
        message: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Compiled ignore matcher for a project's source tree.
#[derive(Debug)]
pub struct IgnorePatterns {
    matcher: Gitignore,
    user_patterns: usize,
}

impl IgnorePatterns {
    /// Only the built-in patterns.
    pub fn builtin(root: &Path) -> Self {
        Self {
            matcher: Self::builder(root).build().unwrap_or_else(|_| Gitignore::empty()),
            user_patterns: 0,
        }
    }

    /// `<root>/.berthignore` on top of the built-ins. A missing file is fine.
    pub fn load(root: &Path) -> Result<Self, IgnoreError> {
        let path = root.join(IGNORE_FILE_NAME);
        let io = |source| IgnoreError::Io {
            path: path.clone(),
            source,
        };

        let size = match fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::builtin(root)),
            Err(e) => return Err(io(e)),
        };
        if size > MAX_FILE_SIZE {
            return Err(IgnoreError::FileTooLarge {
                path,
                size,
                limit: MAX_FILE_SIZE,
            });
        }

        let content = fs::read_to_string(&path).map_err(io)?;
        Self::from_content(root, &path, &content)
    }

    /// Built-ins plus the patterns in `content`, which was read from `source`.
    pub fn from_content(root: &Path, source: &Path, content: &str) -> Result<Self, IgnoreError> {
        let mut builder = Self::builder(root);
        let mut user_patterns = 0;

        let lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'));
        for (index, line) in lines {
            user_patterns += 1;
            if user_patterns > MAX_PATTERNS {
                return Err(IgnoreError::TooManyPatterns {
                    path: source.to_path_buf(),
                    limit: MAX_PATTERNS,
                });
            }
            builder
                .add_line(Some(source.to_path_buf()), line)
                .map_err(|e| IgnoreError::InvalidPattern {
                    path: source.to_path_buf(),
                    line: index + 1,
                    pattern: line.to_string(),
                    message: e.to_string(),
                })?;
        }

        let matcher = builder.build().map_err(|e| IgnoreError::InvalidPattern {
            path: source.to_path_buf(),
            line: 0,
            pattern: String::new(),
            message: e.to_string(),
        })?;
        Ok(Self {
            matcher,
            user_patterns,
        })
    }

    fn builder(root: &Path) -> GitignoreBuilder {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in BUILTIN_PATTERNS {
            // Static patterns; add_line only fails on malformed globs.
            let _ = builder.add_line(None, pattern);
        }
        builder
    }

    /// Check a path relative to the project root.
    pub fn is_ignored(&self, rel_path: &Path, is_dir: bool) -> bool {
        self.matcher
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
    }

    /// Number of user-supplied patterns (built-ins excluded).
    pub fn pattern_count(&self) -> usize {
        self.user_patterns
    }
}
