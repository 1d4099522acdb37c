//! Project requirement (`"starlette>=0.46"`, `"uvicorn[standard]"`)
//!
//! Only the distribution name matters to the build: versions are whatever the
//! lock pins. The raw string is kept for error messages.

use crate::domain::value_objects::{PackageName, PackageNameError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    raw: String,
    name: PackageName,
}

impl Requirement {
    pub fn parse(raw: &str) -> Result<Self, PackageNameError> {
        let raw = raw.trim();
        let end = raw
            .find(|c: char| matches!(c, '[' | '<' | '>' | '=' | '!' | '~' | ';' | '@' | ' ' | '('))
            .unwrap_or(raw.len());
        let name = PackageName::new(&raw[..end])?;
        Ok(Self {
            raw: raw.to_string(),
            name,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }
}
