//! The `Registry`: three disjoint namespaces (package triples, group names,
//! virtual names) enforced while ingesting metadata.
//!
//! Conflicts are warnings that skip the offending addition; none are fatal.
//! This mirrors the loader's historical behavior and is preserved
//! deliberately — see the open questions on duplicate-registry handling.

use ahash::AHashSet;
use anvil_core::{Group, Package, PackageKey, VirtualPackage};

/// The outcome of attempting to register a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Freshly added.
    Added,
    /// Already present in the same namespace — not an error, simply a no-op.
    AlreadyPresent,
    /// Collided with a different namespace; the caller should skip and warn.
    NamespaceConflict,
}

/// Tracks the three namespaces package triples, group names and virtual
/// names must stay disjoint across.
#[derive(Debug, Default)]
pub struct Registry {
    packages: AHashSet<PackageKey>,
    groups: AHashSet<String>,
    virtuals: AHashSet<String>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_package(&self, key: &PackageKey) -> bool {
        self.packages.contains(key)
    }

    #[must_use]
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains(name)
    }

    #[must_use]
    pub fn has_virtual(&self, name: &str) -> bool {
        self.virtuals.contains(name)
    }

    fn name_taken_by_other_namespace(&self, name: &str) -> bool {
        self.groups.contains(name) || self.virtuals.contains(name)
    }

    pub fn add_package(&mut self, package: &Package) -> Registration {
        let key = package.key();
        if self.packages.contains(&key) {
            return Registration::AlreadyPresent;
        }
        if self.name_taken_by_other_namespace(&package.name) {
            return Registration::NamespaceConflict;
        }
        self.packages.insert(key);
        Registration::Added
    }

    pub fn add_group(&mut self, name: &str) -> Registration {
        if self.groups.contains(name) {
            return Registration::AlreadyPresent;
        }
        if self.virtuals.contains(name) || self.packages.iter().any(|k| k.name == name) {
            return Registration::NamespaceConflict;
        }
        self.groups.insert(name.to_string());
        Registration::Added
    }

    pub fn add_virtual(&mut self, name: &str) -> Registration {
        if self.virtuals.contains(name) {
            return Registration::AlreadyPresent;
        }
        if self.groups.contains(name) || self.packages.iter().any(|k| k.name == name) {
            return Registration::NamespaceConflict;
        }
        self.virtuals.insert(name.to_string());
        Registration::Added
    }
}

/// Ingest one document's worth of packages into `set`, registering names
/// with `registry` and emitting a warning for every skipped conflict.
pub fn ingest(registry: &mut Registry, set: &mut anvil_core::Set, packages: Vec<Package>) {
    for package in packages {
        match registry.add_package(&package) {
            Registration::NamespaceConflict => {
                tracing::warn!(package = %package, "skipping package: name collides with an existing group or virtual package");
                continue;
            }
            Registration::AlreadyPresent => {
                tracing::warn!(package = %package, "skipping duplicate package triple");
                continue;
            }
            Registration::Added => {}
        }

        for provided in package.provides().to_vec() {
            match registry.add_virtual(&provided) {
                Registration::NamespaceConflict => {
                    tracing::warn!(name = %provided, "skipping provides: name collides with an existing package or group");
                    continue;
                }
                Registration::AlreadyPresent | Registration::Added => {}
            }
            if set.get_named(&provided).and_then(anvil_core::Unit::as_virtual).is_none() {
                set.insert(VirtualPackage::new(provided.clone()));
            }
            if let Some(anvil_core::Unit::Virtual(v)) = set.get_named_mut(&provided) {
                v.provided_by(&package);
            }
        }

        for group_name in package.metadata.groups.clone() {
            match registry.add_group(&group_name) {
                Registration::NamespaceConflict => {
                    tracing::warn!(name = %group_name, "skipping group membership: name collides with an existing package or virtual");
                    continue;
                }
                Registration::AlreadyPresent | Registration::Added => {}
            }
            if set.get_named(&group_name).and_then(anvil_core::Unit::as_group).is_none() {
                set.insert(Group::new(group_name.clone()));
            }
            if let Some(anvil_core::Unit::Group(g)) = set.get_named_mut(&group_name) {
                g.add(&package);
            }
        }

        set.insert(package);
    }
}
