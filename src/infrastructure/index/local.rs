//! Directory-backed package index
//!
//! Layout: `<root>/<name>/<version>/...` where each version directory holds
//! the unpacked distribution. Name directories may use any spelling that
//! normalizes to the package name (`Typing_Extensions/` serves
//! `typing-extensions`).

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::domain::ports::{IndexError, PackageIndex};
use crate::domain::value_objects::PackageName;

#[derive(Debug, Clone)]
pub struct LocalPackageIndex {
    root: PathBuf,
}

impl LocalPackageIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn package_dir(&self, name: &PackageName) -> Result<Option<PathBuf>, IndexError> {
        let direct = self.root.join(name.as_str());
        if direct.is_dir() {
            return Ok(Some(direct));
        }
        if !self.root.is_dir() {
            return Ok(None);
        }

        let mut matches = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(IndexError::Io)? {
            let entry = entry.map_err(IndexError::Io)?;
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if entry.path().is_dir()
                && PackageName::new(&file_name).is_ok_and(|candidate| &candidate == name)
            {
                matches.push(entry.path());
            }
        }
        matches.sort();
        Ok(matches.into_iter().next())
    }

    fn versions_in(dir: &Path) -> Vec<String> {
        let mut versions: Vec<String> = fs::read_dir(dir)
            .into_iter()
            .flatten()
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        versions.sort();
        versions
    }
}

impl PackageIndex for LocalPackageIndex {
    fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, name: &PackageName, version: &str) -> Result<PathBuf, IndexError> {
        let Some(package_dir) = self.package_dir(name)? else {
            return Err(IndexError::NotFound {
                available: Vec::new(),
            });
        };

        // A version is one directory name; anything else would leave package_dir.
        let single_component = matches!(
            Path::new(version).components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        );
        let dist = package_dir.join(version);
        if single_component && dist.parent() == Some(package_dir.as_path()) && dist.is_dir() {
            tracing::debug!(package = %name, version, path = %dist.display(), "index hit");
            Ok(dist)
        } else {
            Err(IndexError::NotFound {
                available: Self::versions_in(&package_dir),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn name(s: &str) -> PackageName {
        PackageName::new(s).unwrap()
    }

    #[test]
    fn locates_exact_version() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("anyio").join("4.9.0")).unwrap();

        let index = LocalPackageIndex::new(dir.path());
        let found = index.locate(&name("anyio"), "4.9.0").unwrap();
        assert_eq!(found, dir.path().join("anyio").join("4.9.0"));
    }

    #[test]
    fn locates_through_unnormalized_directory_name() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Typing_Extensions").join("4.12.2")).unwrap();

        let index = LocalPackageIndex::new(dir.path());
        assert!(index.locate(&name("typing-extensions"), "4.12.2").is_ok());
    }

    #[test]
    fn missing_version_lists_available() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("starlette").join("0.46.2")).unwrap();
        fs::create_dir_all(dir.path().join("starlette").join("0.45.3")).unwrap();

        let index = LocalPackageIndex::new(dir.path());
        match index.locate(&name("starlette"), "9.9.9") {
            Err(IndexError::NotFound { available }) => {
                assert_eq!(available, vec!["0.45.3", "0.46.2"]);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn versions_that_leave_the_package_directory_are_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("anyio").join("4.9.0")).unwrap();
        fs::create_dir_all(dir.path().join("x")).unwrap();

        let index = LocalPackageIndex::new(dir.path());
        let outside = dir.path().join("x");
        for version in ["../x", outside.to_str().unwrap(), ".", "4.9.0/.."] {
            assert!(
                matches!(
                    index.locate(&name("anyio"), version),
                    Err(IndexError::NotFound { .. })
                ),
                "{version} should not be located"
            );
        }
    }

    #[test]
    fn missing_package_and_missing_index_are_not_found() {
        let dir = tempdir().unwrap();
        let index = LocalPackageIndex::new(dir.path());
        assert!(matches!(
            index.locate(&name("ghost"), "1.0"),
            Err(IndexError::NotFound { .. })
        ));

        let absent = LocalPackageIndex::new(dir.path().join("nope"));
        assert!(matches!(
            absent.locate(&name("ghost"), "1.0"),
            Err(IndexError::NotFound { .. })
        ));
    }
}
