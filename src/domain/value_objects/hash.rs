//! Content Hash Value Object
//!
//! A validated, immutable SHA-256 digest. Used for package integrity in the
//! lock descriptor and for the tree digests recorded in the runtime image.

use std::fmt;

use sha2::{Digest, Sha256};

/// Content hash value object
///
/// Wraps a SHA-256 hex digest with the `sha256:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

/// Reasons a hash string is rejected by [`ContentHash::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashParseError {
    #[error("unsupported hash algorithm in '{0}' (expected sha256:<hex>)")]
    UnsupportedAlgorithm(String),
    #[error("sha256 digest must be 64 hex characters, got {0}")]
    BadLength(usize),
    #[error("sha256 digest contains non-hex characters: '{0}'")]
    NotHex(String),
}

impl ContentHash {
    /// Prefix for SHA-256 hashes
    pub const PREFIX: &'static str = "sha256:";

    /// Parse a `sha256:<hex>` string, normalizing the hex to lowercase.
    pub fn parse(s: &str) -> Result<Self, HashParseError> {
        let hex = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| HashParseError::UnsupportedAlgorithm(s.to_string()))?;
        if hex.len() != 64 {
            return Err(HashParseError::BadLength(hex.len()));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HashParseError::NotHex(hex.to_string()));
        }
        Ok(Self(format!("{}{}", Self::PREFIX, hex.to_ascii_lowercase())))
    }

    /// Create a ContentHash by computing SHA-256 of raw bytes
    pub fn from_bytes(content: &[u8]) -> Self {
        Self::from_digest(Sha256::digest(content).as_slice())
    }

    fn from_digest(digest: &[u8]) -> Self {
        let mut out = String::with_capacity(Self::PREFIX.len() + 64);
        out.push_str(Self::PREFIX);
        for byte in digest {
            out.push_str(&format!("{:02x}", byte));
        }
        Self(out)
    }

    /// Get the full hash string with prefix
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get just the hex part without prefix
    pub fn hex(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }

    /// Short form for human output (first 12 hex chars)
    pub fn short(&self) -> &str {
        &self.hex()[..12.min(self.hex().len())]
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Incremental tree digest.
///
/// Records must be fed in ascending order of their `/`-joined path string.
/// Each record contributes `path NUL bytes NUL`, with `/` as the separator on
/// every platform, so the same tree hashes identically wherever it lives.
///
/// Records are not length-prefixed. File content containing NUL bytes can
/// reproduce a record boundary, so two different trees may share a digest
/// when one file embeds `NUL path NUL bytes` of a sibling. The record layout
/// is fixed because lock hashes are computed with it.
#[derive(Default)]
pub struct TreeHasher {
    hasher: Sha256,
    files: usize,
}

impl TreeHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, relative_path: &str, content: &[u8]) {
        self.hasher.update(relative_path.as_bytes());
        self.hasher.update([0u8]);
        self.hasher.update(content);
        self.hasher.update([0u8]);
        self.files += 1;
    }

    pub fn file_count(&self) -> usize {
        self.files
    }

    pub fn finish(self) -> ContentHash {
        ContentHash::from_digest(self.hasher.finalize().as_slice())
    }
}
