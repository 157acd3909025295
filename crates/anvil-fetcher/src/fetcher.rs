//! Repository operations: download, sync, clear, enable-local. Each shells
//! out to the repository's configured handler command.

use crate::env_guard::EnvGuard;
use ahash::AHashMap;
use anvil_config::{Configuration, RepositoryEntry};
use anvil_core::{Error, Package, Result};
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Invoke `handler` with `target` as its sole argument, with the current
/// directory set to `dest` first — the handler is expected to land its
/// output under the current directory, same basename as `target`.
fn run(handler: &str, target: &str, dest: &Path) -> Result<bool> {
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{handler} {target}"))
        .current_dir(dest)
        .status()
        .map_err(|e| Error::io(handler, e))?;
    Ok(status.success())
}

fn repository<'a>(config: &'a Configuration, name: &str) -> Result<&'a RepositoryEntry> {
    config.repositories.get(name).ok_or_else(|| Error::repository_error(name))
}

/// Download the archive for each package whose cache entry is missing,
/// grouped by repository so each repository's env overlay is applied once.
pub fn download(config: &Configuration, packages: &[Package]) -> Result<()> {
    let mut by_repository: AHashMap<&str, Vec<&Package>> = AHashMap::new();
    for package in packages {
        let cache_dir = config
            .available_dir()
            .join(&package.repository)
            .join("cache")
            .join(&package.name)
            .join(&package.version)
            .join(&package.architecture);
        if !cache_dir.join("package.tar.gz").is_file() {
            by_repository.entry(package.repository.as_str()).or_default().push(package);
        }
    }

    for (name, packages) in by_repository {
        let entry = repository(config, name)?;
        let _guard = entry.env.as_ref().map(EnvGuard::apply);

        for package in packages {
            if !package.has_checksum(None) {
                continue;
            }
            let cache_dir = config
                .available_dir()
                .join(&package.repository)
                .join("cache")
                .join(&package.name)
                .join(&package.version)
                .join(&package.architecture);
            std::fs::create_dir_all(&cache_dir).map_err(|e| Error::io(&cache_dir, e))?;

            let target = format!("{}/{}/{}/{}/package.tar.gz", entry.target, package.name, package.version, package.architecture);
            debug!(package = %package, repository = name, "downloading archive");
            if !run(&entry.handler, &target, &cache_dir)? {
                return Err(Error::download_error(package.to_string(), format!("handler exited non-zero for repository '{name}'")));
            }
        }
    }
    Ok(())
}

/// Synchronise every enabled repository's metadata for every enabled
/// architecture. Non-zero handler exits are warnings, not fatal.
pub fn sync(config: &Configuration) -> Result<()> {
    clear(config, false)?;

    for (name, entry) in &config.repositories {
        let repo_dir = config.available_dir().join(name);
        std::fs::create_dir_all(&repo_dir).map_err(|e| Error::io(&repo_dir, e))?;

        let _guard = entry.env.as_ref().map(EnvGuard::apply);
        for arch in &config.architectures.enabled {
            let target = format!("{}/{arch}.yml", entry.target);
            match run(&entry.handler, &target, &repo_dir) {
                Ok(true) => {}
                Ok(false) => warn!(repository = name, arch, "could not synchronise architecture from repository"),
                Err(e) => warn!(repository = name, arch, error = %e, "could not synchronise architecture from repository"),
            }
        }
    }
    Ok(())
}

/// Remove either the full available/* tree (`cache = true`) or just the
/// per-repository metadata files (`cache = false`).
pub fn clear(config: &Configuration, cache: bool) -> Result<()> {
    let available = config.available_dir();
    if !available.is_dir() {
        return Ok(());
    }

    let entries = std::fs::read_dir(&available).map_err(|e| Error::io(&available, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&available, e))?;
        let path = entry.path();
        if cache {
            let result = if path.is_dir() { std::fs::remove_dir_all(&path) } else { std::fs::remove_file(&path) };
            result.map_err(|_| Error::clear_error(format!("could not remove '{}'", path.display())))?;
        } else if path.is_dir() {
            let repo_entries = std::fs::read_dir(&path).map_err(|e| Error::io(&path, e))?;
            for repo_entry in repo_entries {
                let repo_entry = repo_entry.map_err(|e| Error::io(&path, e))?;
                let file = repo_entry.path();
                if file.extension().and_then(|e| e.to_str()) == Some("yml") {
                    std::fs::remove_file(&file).map_err(|_| Error::clear_error(format!("could not remove '{}'", file.display())))?;
                }
            }
        }
    }
    Ok(())
}

/// Register a local filesystem path as a repository target. No handler is
/// invoked — the repository table entry alone determines behaviour.
pub fn enable_local(config: &mut Configuration, name: impl Into<String>, path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::enable_error(path, "not a directory"));
    }
    let name = name.into();
    config.repositories.insert(
        name,
        RepositoryEntry { target: path.display().to_string(), handler: "cp -r".to_string(), env: None },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_config::Architectures;
    use std::collections::BTreeMap;

    fn config(db: std::path::PathBuf) -> Configuration {
        Configuration {
            repositories: BTreeMap::new(),
            architectures: Architectures { default: "amd64".into(), enabled: vec!["amd64".into()] },
            groups: None,
            db,
            root: std::path::PathBuf::from("/"),
        }
    }

    #[test]
    fn enable_local_rejects_a_nonexistent_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path().join("db"));
        let missing = dir.path().join("does-not-exist");
        assert!(enable_local(&mut config, "local", &missing).is_err());
    }

    #[test]
    fn enable_local_registers_a_repository_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path().join("db"));
        let repo_path = dir.path().join("repo");
        std::fs::create_dir_all(&repo_path).unwrap();

        enable_local(&mut config, "local", &repo_path).unwrap();

        let entry = config.repositories.get("local").unwrap();
        assert_eq!(entry.target, repo_path.display().to_string());
    }

    #[test]
    fn clear_without_cache_only_removes_yaml_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("db"));
        let repo_dir = config.available_dir().join("main");
        std::fs::create_dir_all(repo_dir.join("cache")).unwrap();
        std::fs::write(repo_dir.join("amd64.yml"), "x").unwrap();

        clear(&config, false).unwrap();

        assert!(!repo_dir.join("amd64.yml").exists());
        assert!(repo_dir.join("cache").is_dir());
    }

    #[test]
    fn clear_with_cache_removes_the_whole_available_tree() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("db"));
        let repo_dir = config.available_dir().join("main");
        std::fs::create_dir_all(repo_dir.join("cache")).unwrap();

        clear(&config, true).unwrap();

        assert!(!repo_dir.exists());
    }

    #[test]
    fn download_fails_for_an_unknown_repository() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("db"));
        let mut package = Package::new("hello", "1.0", "amd64");
        package.repository = "missing".into();
        package.metadata.checksums.insert("sha1".into(), "a".repeat(40));

        let err = download(&config, &[package]).unwrap_err();
        assert_eq!(err.code(), anvil_core::error::ErrorCode::RepositoryError);
    }
}
