//! Builds the available and installed [`anvil_core::Set`]s from disk.
//!
//! Layout:
//! - available: `<db>/available/<repo>/<arch>.yml`, a `name → version →
//!   architecture → package-data` mapping for that repository/architecture.
//! - installed: `<db>/installed/<name>/<version>/<arch>/metadata.yml`, the
//!   same mapping shape, holding exactly one package.

use crate::registry::{ingest, Registry};
use anvil_core::{flatten_metadata_map, MetadataMap, Result, Set};
use std::path::Path;
use walkdir::WalkDir;

/// Load the available set from `<db>/available/*/*.yml`, skipping the
/// `cache/` subtree each repository keeps alongside its metadata.
pub fn load_available(db: &Path) -> Result<Set> {
    let root = db.join("available");
    let mut registry = Registry::new();
    let mut set = Set::new();
    if !root.is_dir() {
        return Ok(set);
    }

    for entry in WalkDir::new(&root).min_depth(2).max_depth(2).into_iter().filter_map(std::result::Result::ok) {
        let path = entry.path();
        if path.extension().and_then(std::ffi::OsStr::to_str) != Some("yml") {
            continue;
        }
        if path.components().any(|c| c.as_os_str() == "cache") {
            continue;
        }
        let repository = path
            .parent()
            .and_then(std::path::Path::file_name)
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or_default()
            .to_string();

        let map: MetadataMap = anvil_core::yaml::from_file(path)?;
        let packages = flatten_metadata_map(map)
            .into_iter()
            .map(|mut p| {
                p.repository = repository.clone();
                p
            })
            .collect();
        ingest(&mut registry, &mut set, packages);
    }

    Ok(set)
}

/// Load the installed set from
/// `<db>/installed/<name>/<version>/<arch>/metadata.yml`.
pub fn load_installed(db: &Path) -> Result<Set> {
    let root = db.join("installed");
    let mut registry = Registry::new();
    let mut set = Set::new();
    if !root.is_dir() {
        return Ok(set);
    }

    for entry in WalkDir::new(&root).min_depth(4).max_depth(4).into_iter().filter_map(std::result::Result::ok) {
        let path = entry.path();
        if path.file_name().and_then(std::ffi::OsStr::to_str) != Some("metadata.yml") {
            continue;
        }
        let map: MetadataMap = anvil_core::yaml::from_file(path)?;
        ingest(&mut registry, &mut set, flatten_metadata_map(map));
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_available_packages_from_repo_arch_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo_dir = dir.path().join("available").join("main");
        std::fs::create_dir_all(&repo_dir).unwrap();
        std::fs::write(repo_dir.join("amd64.yml"), "foo:\n  \"1.0\":\n    amd64: {}\n").unwrap();

        let set = load_available(dir.path()).unwrap();
        assert_eq!(set.packages().count(), 1);
        assert_eq!(set.packages().next().unwrap().repository, "main");
    }

    #[test]
    fn ignores_cache_subtree() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("available").join("main").join("cache").join("foo").join("1.0").join("amd64");
        std::fs::create_dir_all(&cache_dir).unwrap();
        std::fs::write(cache_dir.join("amd64.yml"), "{}").unwrap();

        let set = load_available(dir.path()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn loads_installed_packages_from_metadata_files() {
        let dir = tempfile::tempdir().unwrap();
        let meta_dir = dir.path().join("installed").join("foo").join("1.0").join("amd64");
        std::fs::create_dir_all(&meta_dir).unwrap();
        std::fs::write(meta_dir.join("metadata.yml"), "foo:\n  \"1.0\":\n    amd64: {}\n").unwrap();

        let set = load_installed(dir.path()).unwrap();
        assert_eq!(set.packages().count(), 1);
    }

    #[test]
    fn missing_tree_is_an_empty_set_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let set = load_available(dir.path()).unwrap();
        assert!(set.is_empty());
    }
}
