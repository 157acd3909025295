//! Shared plumbing for the per-verb command modules: configuration/registry
//! loading, target resolution, confirmation prompts, and error exit codes.

use anvil_config::Configuration;
use anvil_core::error::ErrorCode;
use anvil_core::{relationship, Error, Package, PackageKey, Result, Set, Unit};
use dialoguer::Confirm;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The loaded configuration plus the available and installed Sets, the
/// inputs every planning operation needs.
pub struct Context {
    pub config: Configuration,
    pub available: Set,
    pub installed: Set,
}

pub fn load(config_path: &Path) -> Result<Context> {
    let config = anvil_config::load(config_path)?;
    let available = anvil_registry::load_available(&config.db)?;
    let installed = anvil_registry::load_installed(&config.db)?;
    Ok(Context { config, available, installed })
}

/// Resolve each user-supplied target string against `set`, in the order
/// given. An unresolvable target is a broken dependency rooted at itself.
pub fn resolve_units(set: &Set, targets: &[String]) -> Result<Vec<Unit>> {
    targets
        .iter()
        .map(|target| {
            let rel = relationship::parse(target).ok_or_else(|| Error::semantic(format!("'{target}' is not a valid target")))?;
            set.target(&rel).cloned().ok_or_else(|| Error::broken_dependency(target.clone(), target.clone()))
        })
        .collect()
}

/// Resolve each user-supplied target to an installed package, for the
/// upgrade/downgrade operations which only accept packages.
pub fn resolve_installed_packages(installed: &Set, targets: &[String]) -> Result<Vec<Package>> {
    resolve_units(installed, targets)?
        .into_iter()
        .map(|unit| unit.as_package().cloned().ok_or_else(|| Error::semantic("upgrade/downgrade targets must name packages")))
        .collect()
}

/// The path `anvil-fetcher::download` would have populated for `package`,
/// mirroring its cache layout exactly.
#[must_use]
pub fn cached_archive_path(config: &Configuration, package: &Package) -> PathBuf {
    config
        .available_dir()
        .join(&package.repository)
        .join("cache")
        .join(&package.name)
        .join(&package.version)
        .join(&package.architecture)
        .join("package.tar.gz")
}

/// Flatten groups and virtual packages down to the concrete packages they
/// name, for operations (like `download`) that want packages without the
/// full dependency-planning machinery.
pub fn expand_to_packages(set: &Set, units: Vec<Unit>, chooser: &dyn anvil_resolver::Chooser) -> Result<Vec<Package>> {
    let mut out = Vec::new();
    for unit in units {
        expand_one(set, unit, chooser, &mut out)?;
    }
    Ok(out)
}

fn expand_one(set: &Set, unit: Unit, chooser: &dyn anvil_resolver::Chooser, out: &mut Vec<Package>) -> Result<()> {
    match unit {
        Unit::Package(p) => {
            out.push(p);
            Ok(())
        }
        Unit::Group(group) => {
            for key in &group.members {
                let identity = format!("{}:{} {}", key.name, key.arch, key.version);
                if let Some(member) = set.get_named(&identity).cloned() {
                    expand_one(set, member, chooser, out)?;
                }
            }
            Ok(())
        }
        Unit::Virtual(v) => {
            if v.providers.is_empty() {
                return Err(Error::broken_dependency(v.name.clone(), v.name.clone()));
            }
            let index = if v.providers.len() == 1 { 0 } else { chooser.choose(&v.name, &v.providers) };
            let key = &v.providers[index];
            let identity = format!("{}:{} {}", key.name, key.arch, key.version);
            let Some(provider) = set.get_named(&identity).cloned() else {
                return Err(Error::broken_dependency(v.name.clone(), v.name.clone()));
            };
            expand_one(set, provider, chooser, out)
        }
    }
}

/// Order `set`'s packages so that each one's dependencies (when also
/// present in `set`) precede it — a topological sort over the dependency
/// graph restricted to `set`, via postorder depth-first traversal.
#[must_use]
pub fn install_order(set: &Set) -> Vec<Package> {
    let mut order = Vec::new();
    let mut done = HashSet::new();
    let mut visiting = HashSet::new();
    for package in set.packages() {
        visit_for_order(set, package, &mut done, &mut visiting, &mut order);
    }
    order
}

/// The order uninstallation should proceed in: a package's dependents (also
/// present in `set`) are removed before the package itself — the reverse
/// of [`install_order`].
#[must_use]
pub fn uninstall_order(set: &Set) -> Vec<Package> {
    let mut order = install_order(set);
    order.reverse();
    order
}

fn visit_for_order(
    set: &Set,
    package: &Package,
    done: &mut HashSet<PackageKey>,
    visiting: &mut HashSet<PackageKey>,
    order: &mut Vec<Package>,
) {
    let key = package.key();
    if done.contains(&key) || visiting.contains(&key) {
        return;
    }
    visiting.insert(key.clone());
    for dep in package.depends() {
        if let Some(rel) = relationship::parse(dep) {
            if let Some(dep_package) = set.target(&rel).and_then(Unit::as_package).cloned() {
                visit_for_order(set, &dep_package, done, visiting, order);
            }
        }
    }
    visiting.remove(&key);
    done.insert(key);
    order.push(package.clone());
}

/// Ask for confirmation unless `--yes` was given. A non-interactive stdin
/// (piped, redirected) is treated as a decline rather than hanging.
pub fn confirm(assume_yes: bool, message: &str) -> bool {
    if assume_yes {
        return true;
    }
    Confirm::new().with_prompt(message).default(false).interact().unwrap_or(false)
}

/// Map an [`Error`] to a process exit code, grouped by the component that
/// raised it so scripts can distinguish planning failures from execution
/// failures from repository failures.
#[must_use]
pub fn exit_code(error: &Error) -> i32 {
    match error.code() {
        ErrorCode::Semantic => 64,
        ErrorCode::BrokenDependency => 65,
        ErrorCode::Conflict => 66,
        ErrorCode::PackageNotAllowed => 67,
        ErrorCode::InstallError => 70,
        ErrorCode::UninstallError => 71,
        ErrorCode::DownloadError => 72,
        ErrorCode::RepositoryError => 73,
        ErrorCode::ClearError => 74,
        ErrorCode::SyncError => 75,
        ErrorCode::EnableError => 76,
        ErrorCode::Io => 74,
        ErrorCode::Yaml => 78,
    }
}
