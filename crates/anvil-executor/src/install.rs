//! Per-package installation: checksum gate, archive extraction, file
//! tracking.

use crate::{archive, checksum};
use anvil_config::Configuration;
use anvil_core::{build_metadata_map, Error, Package, Result, Set};
use std::path::PathBuf;
use tracing::{debug, warn};

fn package_dir(config: &Configuration, package: &Package) -> PathBuf {
    config.installed_dir().join(&package.name).join(&package.version).join(&package.architecture)
}

fn clean(dir: &PathBuf) {
    if let Err(e) = std::fs::remove_dir_all(dir) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(dir = %dir.display(), error = %e, "failed to clean up package directory after a failed install");
        }
    }
}

/// Install `package` using the archive at `archive_path` (if the package
/// declares a SHA-1 checksum) and record it in `installed`.
pub fn install_one(
    config: &Configuration,
    installed: &mut Set,
    package: Package,
    archive_path: Option<&std::path::Path>,
) -> Result<()> {
    let dir = package_dir(config, &package);
    if dir.exists() {
        return Err(Error::install_error(package.to_string(), "already installed"));
    }
    std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

    if let Err(err) = install_payload(config, &package, &dir, archive_path) {
        clean(&dir);
        return Err(err);
    }

    let metadata_path = dir.join("metadata.yml");
    let map = build_metadata_map(std::slice::from_ref(&package));
    if let Err(err) = anvil_core::yaml::to_file(&metadata_path, &map) {
        clean(&dir);
        return Err(Error::install_error(package.to_string(), err.to_string()));
    }

    debug!(package = %package, "installed");
    installed.insert(package);
    Ok(())
}

fn install_payload(
    config: &Configuration,
    package: &Package,
    dir: &std::path::Path,
    archive_path: Option<&std::path::Path>,
) -> Result<()> {
    let Some(expected) = package.checksum("sha1") else {
        return Ok(());
    };
    let Some(archive_path) = archive_path else {
        return Err(Error::install_error(package.to_string(), "missing archive for a package that declares a checksum"));
    };

    if !checksum::verify(archive_path, expected)? {
        return Err(Error::install_error(package.to_string(), "archive checksum does not match the declared digest"));
    }

    let files = archive::list_files_reversed(archive_path)?;
    let manifest_path = dir.join("files");
    std::fs::write(&manifest_path, archive::render_manifest(&files)).map_err(|e| Error::io(&manifest_path, e))?;

    archive::extract(archive_path, &config.root)?;
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

    #[test]
    fn installs_a_package_without_a_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("db"), dir.path().join("root"));
        std::fs::create_dir_all(&config.root).unwrap();
        let mut installed = Set::new();

        let package = Package::new("hello", "1.0", "amd64");
        install_one(&config, &mut installed, package, None).unwrap();

        assert!(installed.contains_package("hello", "1.0", "amd64"));
        let metadata = config.installed_dir().join("hello/1.0/amd64/metadata.yml");
        assert!(metadata.is_file());
    }

    #[test]
    fn rejects_a_second_install_of_the_same_identity() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("db"), dir.path().join("root"));
        std::fs::create_dir_all(&config.root).unwrap();
        let mut installed = Set::new();

        install_one(&config, &mut installed, Package::new("hello", "1.0", "amd64"), None).unwrap();
        let err = install_one(&config, &mut installed, Package::new("hello", "1.0", "amd64"), None).unwrap_err();
        assert_eq!(err.code(), anvil_core::error::ErrorCode::InstallError);
    }

    #[test]
    fn a_checksummed_package_without_an_archive_fails_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("db"), dir.path().join("root"));
        std::fs::create_dir_all(&config.root).unwrap();
        let mut installed = Set::new();

        let mut package = Package::new("hello", "1.0", "amd64");
        package.metadata.checksums.insert("sha1".into(), "deadbeef".repeat(5));

        let err = install_one(&config, &mut installed, package, None).unwrap_err();
        assert_eq!(err.code(), anvil_core::error::ErrorCode::InstallError);
        assert!(!config.installed_dir().join("hello/1.0/amd64").exists());
    }
}
