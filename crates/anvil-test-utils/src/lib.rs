//! A throwaway db/root tree builder shared by the executor, fetcher, and
//! registry test suites, so each doesn't reinvent the same directory
//! layout inline.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

use anvil_config::{Architectures, Configuration, RepositoryEntry};
use anvil_core::{build_metadata_map, flatten_metadata_map, MetadataMap, Package};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary `db`/`root` pair plus a matching [`Configuration`]. Dropping
/// this removes the whole tree.
pub struct DbFixture {
    _dir: TempDir,
    pub config: Configuration,
}

impl DbFixture {
    /// A fixture with one repository (`main`, handler `cp`) and one enabled
    /// architecture (`amd64`).
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir.path().join("db");
        let root = dir.path().join("root");
        std::fs::create_dir_all(&root).expect("create root");

        let mut repositories = BTreeMap::new();
        repositories.insert("main".to_string(), RepositoryEntry { target: "main-source".into(), handler: "cp".into(), env: None });

        let config = Configuration {
            repositories,
            architectures: Architectures { default: "amd64".into(), enabled: vec!["amd64".into()] },
            groups: None,
            db,
            root,
        };
        Self { _dir: dir, config }
    }

    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.config.root
    }

    #[must_use]
    pub fn db(&self) -> &std::path::Path {
        &self.config.db
    }

    /// Append `packages` to the repository's available metadata for
    /// `architecture`, creating the file if needed. Each package's
    /// `repository` field is overwritten to match.
    pub fn add_available(&self, repository: &str, architecture: &str, mut packages: Vec<Package>) {
        for package in &mut packages {
            package.repository = repository.to_string();
        }
        let dir = self.config.available_dir().join(repository);
        std::fs::create_dir_all(&dir).expect("create repo dir");
        let path = dir.join(format!("{architecture}.yml"));

        let mut existing: Vec<Package> = if path.is_file() {
            let map: MetadataMap = anvil_core::yaml::from_file(&path).unwrap_or_default();
            flatten_metadata_map(map)
        } else {
            Vec::new()
        };
        existing.extend(packages);
        anvil_core::yaml::to_file(&path, &build_metadata_map(&existing)).expect("write available metadata");
    }

    /// Write `package`'s `metadata.yml` directly into the installed tree, as
    /// if a prior `install` had already run, without extracting any files.
    pub fn add_installed(&self, package: &Package) -> PathBuf {
        let dir = self.config.installed_dir().join(&package.name).join(&package.version).join(&package.architecture);
        std::fs::create_dir_all(&dir).expect("create installed dir");
        let map = build_metadata_map(std::slice::from_ref(package));
        anvil_core::yaml::to_file(&dir.join("metadata.yml"), &map).expect("write metadata");
        dir
    }
}

impl Default for DbFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_available_is_additive_across_calls() {
        let fixture = DbFixture::new();
        fixture.add_available("main", "amd64", vec![Package::new("foo", "1.0", "amd64")]);
        fixture.add_available("main", "amd64", vec![Package::new("bar", "1.0", "amd64")]);

        let set = anvil_registry_load(&fixture);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn add_installed_writes_metadata_at_the_expected_path() {
        let fixture = DbFixture::new();
        let package = Package::new("foo", "1.0", "amd64");
        let dir = fixture.add_installed(&package);
        assert!(dir.join("metadata.yml").is_file());
    }

    fn anvil_registry_load(fixture: &DbFixture) -> anvil_core::Set {
        let root = fixture.db().join("available");
        let mut set = anvil_core::Set::new();
        for repo_entry in std::fs::read_dir(&root).unwrap() {
            let repo_entry = repo_entry.unwrap();
            for arch_entry in std::fs::read_dir(repo_entry.path()).unwrap() {
                let arch_entry = arch_entry.unwrap();
                let map: MetadataMap = anvil_core::yaml::from_file(&arch_entry.path()).unwrap();
                for package in flatten_metadata_map(map) {
                    set.insert(package);
                }
            }
        }
        set
    }
}
