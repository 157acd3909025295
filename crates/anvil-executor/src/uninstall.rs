//! Per-package uninstallation: write-access gate, static-file preservation,
//! file and metadata removal.

use crate::archive;
use anvil_config::Configuration;
use anvil_core::{Error, Package, Result, Set};
use std::path::{Path, PathBuf};
use tracing::warn;

#[cfg(unix)]
#[allow(unsafe_code)]
fn writable(path: &Path) -> bool {
    use std::ffi::CString;
    let Ok(c_path) = CString::new(path.as_os_str().as_encoded_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated byte string for the lifetime of this call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn writable(path: &Path) -> bool {
    path.metadata().map(|m| !m.permissions().readonly()).unwrap_or(false)
}

fn package_dir(config: &Configuration, package: &Package) -> PathBuf {
    config.installed_dir().join(&package.name).join(&package.version).join(&package.architecture)
}

fn remove_path(path: &Path) {
    let result = if path.is_dir() { std::fs::remove_dir(path) } else { std::fs::remove_file(path) };
    if let Err(e) = result {
        warn!(path = %path.display(), error = %e, "could not delete a file during uninstall");
    }
}

/// Uninstall `package`, optionally renaming its static files aside instead
/// of deleting them, and drop it from `installed`.
pub fn uninstall_one(config: &Configuration, installed: &mut Set, package: &Package, keep_static: bool) -> Result<()> {
    let dir = package_dir(config, package);
    let manifest_path = dir.join("files");
    let files = std::fs::read_to_string(&manifest_path).map(|text| archive::parse_manifest(&text)).unwrap_or_default();

    let metadata_path = dir.join("metadata.yml");
    let db_artifacts = [metadata_path.as_path(), manifest_path.as_path(), dir.as_path()];

    for file in &files {
        let target = config.root.join(file);
        if target.exists() && !writable(&target) {
            return Err(Error::uninstall_error(package.to_string(), format!("cannot remove '{}'", target.display())));
        }
    }
    for artifact in db_artifacts {
        if artifact.exists() && !writable(artifact) {
            return Err(Error::uninstall_error(package.to_string(), format!("cannot remove '{}'", artifact.display())));
        }
    }

    if keep_static {
        for file in package.static_files() {
            let target = config.root.join(file);
            let preserved = config.root.join(format!("{file}.craft-old"));
            if let Err(e) = std::fs::rename(&target, &preserved) {
                warn!(file = %target.display(), error = %e, "could not preserve a static file during uninstall");
            }
        }
    }

    for file in &files {
        remove_path(&config.root.join(file));
    }
    for artifact in db_artifacts {
        remove_path(artifact);
    }

    let name_dir = config.installed_dir().join(&package.name);
    let version_dir = name_dir.join(&package.version);
    if std::fs::remove_dir(&version_dir).is_ok() {
        let _ = std::fs::remove_dir(&name_dir);
    }

    installed.remove(&anvil_core::Unit::Package(package.clone()).display_identity());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_config::{Architectures, RepositoryEntry};
    use std::collections::BTreeMap;

    fn config(db: PathBuf, root: PathBuf) -> Configuration {
        let mut repositories = BTreeMap::new();
        repositories.insert("main".to_string(), RepositoryEntry { target: "x".into(), handler: "cp".into(), env: None });
        Configuration {
            repositories,
            architectures: Architectures { default: "amd64".into(), enabled: vec!["amd64".into()] },
            groups: None,
            db,
            root,
        }
    }

    fn installed_package(config: &Configuration, package: &Package, files: &[&str]) {
        let dir = package_dir(config, package);
        std::fs::create_dir_all(&dir).unwrap();
        let map = anvil_core::build_metadata_map(std::slice::from_ref(package));
        anvil_core::yaml::to_file(&dir.join("metadata.yml"), &map).unwrap();
        std::fs::write(&dir.join("files"), files.iter().map(|f| format!("{f}\n")).collect::<String>()).unwrap();
        for file in files {
            let target = config.root.join(file);
            if file.ends_with('/') {
                std::fs::create_dir_all(&target).unwrap();
            } else {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent).unwrap();
                }
                std::fs::write(&target, b"data").unwrap();
            }
        }
    }

    #[test]
    fn uninstalls_a_package_and_removes_its_tracked_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("db"), dir.path().join("root"));
        std::fs::create_dir_all(&config.root).unwrap();

        let package = Package::new("hello", "1.0", "amd64");
        installed_package(&config, &package, &["usr/bin/hello", "usr/bin/"]);

        let mut installed = Set::new();
        installed.insert(package.clone());

        uninstall_one(&config, &mut installed, &package, false).unwrap();

        assert!(!config.root.join("usr/bin/hello").exists());
        assert!(!package_dir(&config, &package).exists());
        assert!(!installed.contains_package("hello", "1.0", "amd64"));
    }

    #[test]
    fn preserves_static_files_by_renaming_them_aside() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("db"), dir.path().join("root"));
        std::fs::create_dir_all(&config.root).unwrap();

        let mut package = Package::new("hello", "1.0", "amd64");
        package.metadata.files.r#static = vec!["etc/hello.conf".to_string()];
        installed_package(&config, &package, &["etc/hello.conf"]);

        let mut installed = Set::new();
        installed.insert(package.clone());

        uninstall_one(&config, &mut installed, &package, true).unwrap();

        assert!(config.root.join("etc/hello.conf.craft-old").is_file());
    }
}
