//! Shape- and type-checking of the configuration document against the
//! external-interface schema. Every deviation yields a single error kind,
//! `Semantic`, with enough location context for diagnosis.

use crate::types::Configuration;
use anvil_core::identifier::is_identifier;
use anvil_core::{Error, Result};

/// Validate an already-deserialized configuration against the rules the
/// schema doesn't express structurally: `default ∈ enabled`, identifier
/// shape on architecture names, and filesystem access on `db`/`root`.
pub fn validate(config: &Configuration) -> Result<()> {
    if config.architectures.enabled.is_empty() {
        return Err(Error::semantic("architectures.enabled must not be empty"));
    }
    for arch in &config.architectures.enabled {
        if !is_identifier(arch) {
            return Err(Error::semantic(format!(
                "architectures.enabled contains invalid identifier '{arch}'"
            )));
        }
    }
    if !is_identifier(&config.architectures.default) {
        return Err(Error::semantic(format!(
            "architectures.default '{}' is not a valid identifier",
            config.architectures.default
        )));
    }
    if !config.is_architecture_enabled(&config.architectures.default) {
        return Err(Error::semantic(format!(
            "architectures.default '{}' is not in architectures.enabled",
            config.architectures.default
        )));
    }

    if let Some(groups) = &config.groups {
        for group in groups {
            if !is_identifier(group) {
                return Err(Error::semantic(format!("groups contains invalid identifier '{group}'")));
            }
        }
    }

    for (name, repo) in &config.repositories {
        if !is_identifier(name) {
            return Err(Error::semantic(format!("repositories contains invalid name '{name}'")));
        }
        if repo.target.is_empty() {
            return Err(Error::semantic(format!("repositories.{name}.target must not be empty")));
        }
        if repo.handler.is_empty() {
            return Err(Error::semantic(format!("repositories.{name}.handler must not be empty")));
        }
    }

    require_writable_traversable_dir(&config.db, "db")?;
    require_writable_traversable_dir(&config.root, "root")?;

    Ok(())
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn require_writable_traversable_dir(path: &std::path::Path, field: &str) -> Result<()> {
    use std::ffi::CString;

    if !path.is_dir() {
        return Err(Error::semantic(format!("{field} '{}' does not exist or is not a directory", path.display())));
    }
    let c_path = CString::new(path.as_os_str().as_encoded_bytes())
        .map_err(|_| Error::semantic(format!("{field} '{}' contains a NUL byte", path.display())))?;
    // SAFETY: c_path is a valid NUL-terminated byte string for the lifetime of this call.
    let rc = unsafe { libc::access(c_path.as_ptr(), libc::W_OK | libc::X_OK) };
    if rc != 0 {
        return Err(Error::semantic(format!("{field} '{}' is not writable and traversable", path.display())));
    }
    Ok(())
}

#[cfg(not(unix))]
fn require_writable_traversable_dir(path: &std::path::Path, field: &str) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::semantic(format!("{field} '{}' does not exist or is not a directory", path.display())));
    }
    Ok(())
}
