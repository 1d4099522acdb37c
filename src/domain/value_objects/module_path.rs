//! Dotted module path of the entry point (`src.server`)

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A validated dotted module path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModulePath(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid module path '{0}': expected dotted identifiers like 'src.server'")]
pub struct ModulePathError(pub String);

impl ModulePath {
    pub fn new(raw: &str) -> Result<Self, ModulePathError> {
        let valid = !raw.is_empty()
            && raw.split('.').all(|segment| {
                let mut chars = segment.chars();
                matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
                    && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
            });
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(ModulePathError(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Files that would satisfy `python -m <module>`, relative to the
    /// application root, in lookup order.
    pub fn candidate_files(&self) -> [PathBuf; 2] {
        let base: PathBuf = self.0.split('.').collect();
        [base.with_extension("py"), base.join("__main__.py")]
    }
}

impl Default for ModulePath {
    fn default() -> Self {
        Self("src.server".to_string())
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ModulePath {
    type Error = ModulePathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ModulePath> for String {
    fn from(value: ModulePath) -> Self {
        value.0
    }
}
