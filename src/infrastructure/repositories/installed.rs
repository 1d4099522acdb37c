//! TOML Install Record Repository
//!
//! Persists the installed package set as `installed.toml` next to the staged
//! `site-packages`. Output is sorted so repeated builds write identical bytes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{InstalledPackage, InstalledPackageSet, INSTALL_RECORD_VERSION};
use crate::domain::ports::file_system::{FileSystem, FsError};
use crate::domain::ports::{InstallRecordRepository, RecordError};
use crate::domain::value_objects::{ContentHash, PackageName};
use crate::infrastructure::fs::LocalFs;

pub struct TomlInstallRecordRepository {
    fs: LocalFs,
}

impl TomlInstallRecordRepository {
    pub fn new() -> Self {
        Self { fs: LocalFs::new() }
    }
}

impl Default for TomlInstallRecordRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlInstalledPackage {
    name: String,
    version: String,
    hash: String,
    #[serde(default)]
    files: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlInstallRecord {
    version: u32,
    #[serde(default, rename = "package")]
    packages: Vec<TomlInstalledPackage>,
}

pub(crate) fn read_utf8(fs: &LocalFs, path: &Path) -> Result<String, RecordError> {
    let bytes = fs.read(path).map_err(|e| match e {
        FsError::NotFound(_) => RecordError::NotFound,
        other => RecordError::Io(other.into_io()),
    })?;
    String::from_utf8(bytes).map_err(|e| RecordError::InvalidFormat(e.to_string()))
}

impl InstallRecordRepository for TomlInstallRecordRepository {
    fn load(&self, path: &Path) -> Result<InstalledPackageSet, RecordError> {
        let content = read_utf8(&self.fs, path)?;
        let record: TomlInstallRecord =
            toml::from_str(&content).map_err(|e| RecordError::InvalidFormat(e.to_string()))?;

        if record.version != INSTALL_RECORD_VERSION {
            return Err(RecordError::InvalidFormat(format!(
                "unsupported record version {} (expected {})",
                record.version, INSTALL_RECORD_VERSION
            )));
        }

        let packages = record
            .packages
            .into_iter()
            .map(|p| {
                let name = PackageName::new(&p.name)
                    .map_err(|e| RecordError::InvalidFormat(e.to_string()))?;
                let hash = ContentHash::parse(&p.hash)
                    .map_err(|e| RecordError::InvalidFormat(e.to_string()))?;
                Ok(InstalledPackage::new(name, p.version, hash, p.files))
            })
            .collect::<Result<Vec<_>, RecordError>>()?;

        Ok(InstalledPackageSet::new(packages))
    }

    fn save(&self, set: &InstalledPackageSet, path: &Path) -> Result<(), RecordError> {
        let record = TomlInstallRecord {
            version: INSTALL_RECORD_VERSION,
            packages: set
                .packages()
                .iter()
                .map(|p| TomlInstalledPackage {
                    name: p.name().to_string(),
                    version: p.version().to_string(),
                    hash: p.hash().to_string(),
                    files: p.files().to_vec(),
                })
                .collect(),
        };

        let content = toml::to_string_pretty(&record)
            .map_err(|e| RecordError::InvalidFormat(e.to_string()))?;
        self.fs
            .write(path, content.as_bytes())
            .map_err(|e| RecordError::Io(e.into_io()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> InstalledPackageSet {
        InstalledPackageSet::new(vec![
            InstalledPackage::new(
                PackageName::new("sniffio").unwrap(),
                "1.3.1",
                ContentHash::from_bytes(b"sniffio"),
                vec!["sniffio/__init__.py".to_string()],
            ),
            InstalledPackage::new(
                PackageName::new("anyio").unwrap(),
                "4.9.0",
                ContentHash::from_bytes(b"anyio"),
                vec![
                    "anyio/_core.py".to_string(),
                    "anyio/__init__.py".to_string(),
                ],
            ),
        ])
    }

    #[test]
    fn save_then_load_preserves_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("installed.toml");
        let repo = TomlInstallRecordRepository::new();

        repo.save(&sample(), &path).unwrap();
        assert_eq!(repo.load(&path).unwrap(), sample());
    }

    #[test]
    fn saved_bytes_are_stable() {
        let dir = tempdir().unwrap();
        let repo = TomlInstallRecordRepository::new();
        let a = dir.path().join("a.toml");
        let b = dir.path().join("b.toml");

        repo.save(&sample(), &a).unwrap();
        repo.save(&sample(), &b).unwrap();

        let content = std::fs::read_to_string(&a).unwrap();
        assert_eq!(content, std::fs::read_to_string(&b).unwrap());
        assert!(content.find("anyio").unwrap() < content.find("sniffio").unwrap());
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let err = TomlInstallRecordRepository::new()
            .load(&dir.path().join("installed.toml"))
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFound));
    }

    #[test]
    fn load_rejects_other_versions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("installed.toml");
        std::fs::write(&path, "version = 9\n").unwrap();
        assert!(matches!(
            TomlInstallRecordRepository::new().load(&path),
            Err(RecordError::InvalidFormat(_))
        ));
    }
}
