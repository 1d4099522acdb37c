//! Package name value object
//!
//! Names are compared in normalized form: lowercase, with every run of `-`,
//! `_` and `.` collapsed to a single `-`. `Typing_Extensions`,
//! `typing.extensions` and `typing-extensions` are the same package.

use std::fmt;

/// A validated, normalized package name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackageNameError {
    #[error("package name is empty")]
    Empty,
    #[error("invalid character '{ch}' in package name '{name}'")]
    InvalidChar { name: String, ch: char },
    #[error("package name '{0}' must start and end with a letter or digit")]
    BadBoundary(String),
}

impl PackageName {
    pub fn new(raw: &str) -> Result<Self, PackageNameError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PackageNameError::Empty);
        }
        if let Some(ch) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(PackageNameError::InvalidChar {
                name: raw.to_string(),
                ch,
            });
        }
        let first = raw.chars().next().unwrap_or('-');
        let last = raw.chars().last().unwrap_or('-');
        if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
            return Err(PackageNameError::BadBoundary(raw.to_string()));
        }
        Ok(Self(normalize(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_separator = false;
    for c in raw.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }
    out
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for PackageName {
    type Err = PackageNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
