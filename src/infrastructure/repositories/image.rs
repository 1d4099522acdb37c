//! TOML Image Manifest Repository
//!
//! Persists `berth-image.toml` at the root of a runtime image.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{EntryPoint, ImageManifest, ImagePackage, IMAGE_FORMAT_VERSION};
use crate::domain::ports::file_system::FileSystem;
use crate::domain::ports::{ImageManifestRepository, RecordError};
use crate::domain::value_objects::{ContentHash, ModulePath, PackageName};
use crate::infrastructure::fs::LocalFs;

use super::installed::read_utf8;

pub struct TomlImageManifestRepository {
    fs: LocalFs,
}

impl TomlImageManifestRepository {
    pub fn new() -> Self {
        Self { fs: LocalFs::new() }
    }
}

impl Default for TomlImageManifestRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlEntry {
    module: ModulePath,
    port: u16,
    interpreter: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlImagePackage {
    name: String,
    version: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlDigest {
    site_packages: String,
    app: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlImageManifest {
    version: u32,
    project: String,
    entry: TomlEntry,
    #[serde(default)]
    env: BTreeMap<String, String>,
    digest: TomlDigest,
    #[serde(default, rename = "package")]
    packages: Vec<TomlImagePackage>,
}

fn invalid(e: impl std::fmt::Display) -> RecordError {
    RecordError::InvalidFormat(e.to_string())
}

impl ImageManifestRepository for TomlImageManifestRepository {
    fn load(&self, path: &Path) -> Result<ImageManifest, RecordError> {
        let content = read_utf8(&self.fs, path)?;
        let manifest: TomlImageManifest = toml::from_str(&content).map_err(invalid)?;

        if manifest.version != IMAGE_FORMAT_VERSION {
            return Err(RecordError::InvalidFormat(format!(
                "unsupported image format version {} (expected {})",
                manifest.version, IMAGE_FORMAT_VERSION
            )));
        }

        let packages = manifest
            .packages
            .into_iter()
            .map(|p| {
                Ok(ImagePackage {
                    name: PackageName::new(&p.name).map_err(invalid)?,
                    version: p.version,
                })
            })
            .collect::<Result<Vec<_>, RecordError>>()?;

        Ok(ImageManifest {
            project: manifest.project,
            entry: EntryPoint {
                module: manifest.entry.module,
                port: manifest.entry.port,
                interpreter: manifest.entry.interpreter,
            },
            env: manifest.env,
            packages,
            site_packages_digest: ContentHash::parse(&manifest.digest.site_packages)
                .map_err(invalid)?,
            app_digest: ContentHash::parse(&manifest.digest.app).map_err(invalid)?,
        })
    }

    fn save(&self, manifest: &ImageManifest, path: &Path) -> Result<(), RecordError> {
        let toml_manifest = TomlImageManifest {
            version: manifest.version(),
            project: manifest.project.clone(),
            entry: TomlEntry {
                module: manifest.entry.module.clone(),
                port: manifest.entry.port,
                interpreter: manifest.entry.interpreter.clone(),
            },
            env: manifest.env.clone(),
            digest: TomlDigest {
                site_packages: manifest.site_packages_digest.to_string(),
                app: manifest.app_digest.to_string(),
            },
            packages: manifest
                .packages
                .iter()
                .map(|p| TomlImagePackage {
                    name: p.name.to_string(),
                    version: p.version.clone(),
                })
                .collect(),
        };

        let content = toml::to_string_pretty(&toml_manifest).map_err(invalid)?;
        self.fs
            .write(path, content.as_bytes())
            .map_err(|e| RecordError::Io(e.into_io()))
    }
}
