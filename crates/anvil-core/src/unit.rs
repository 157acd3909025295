//! The unit model: `Package`, `VirtualPackage`, `Group`.
//!
//! `Unit` is a closed sum over the three kinds rather than a trait-object
//! hierarchy — the universe of unit kinds never grows, so a tagged variant
//! lets callers match exhaustively instead of downcasting.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two built-in temporary flags the resolver sets on newly targeted
/// packages; see [`Package::add_temporary_flag`].
pub const FLAG_INSTALLED_BY_USER: &str = "installed-by-user";
pub const FLAG_INSTALLED_AS_DEPENDENCY: &str = "installed-as-dependency";

/// The identity of a concrete package: name, version and architecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageKey {
    pub name: String,
    pub version: String,
    pub arch: String,
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.name, self.arch, self.version)
    }
}

/// Free-form per-package metadata, deserialized straight from the repository
/// or installed metadata schema (see the external interfaces).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageMetadata {
    pub checksums: AHashMap<String, String>,
    #[serde(rename = "files")]
    pub files: Files,
    pub depends: Vec<String>,
    pub conflicts: Vec<String>,
    pub replaces: Vec<String>,
    pub provides: Vec<String>,
    pub groups: Vec<String>,
    pub information: Information,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Files {
    pub r#static: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Information {
    pub maintainers: Vec<String>,
    pub tags: Vec<String>,
    pub misc: AHashMap<String, String>,
}

/// A concrete installable artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub architecture: String,
    #[serde(skip)]
    pub repository: String,
    #[serde(flatten)]
    pub metadata: PackageMetadata,
    /// Persistent flags: serialized to `metadata.yml` alongside the rest of
    /// the metadata, under the `flags` key.
    #[serde(rename = "flags", default)]
    persistent_flags: AHashSet<String>,
    /// In-memory-only flags, promoted to persistent on [`Package::commit`].
    #[serde(skip)]
    temporary_flags: AHashSet<String>,
}

impl Package {
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            architecture: architecture.into(),
            repository: String::new(),
            metadata: PackageMetadata::default(),
            persistent_flags: AHashSet::new(),
            temporary_flags: AHashSet::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> PackageKey {
        PackageKey {
            name: self.name.clone(),
            version: self.version.clone(),
            arch: self.architecture.clone(),
        }
    }

    /// The identifier used to target this package via the relationship DSL.
    #[must_use]
    pub fn as_target(&self) -> String {
        format!("{}:{}", self.name, self.architecture)
    }

    #[must_use]
    pub fn has_checksum(&self, algorithm: Option<&str>) -> bool {
        match algorithm {
            Some(algo) => self.metadata.checksums.contains_key(algo),
            None => !self.metadata.checksums.is_empty(),
        }
    }

    pub fn checksum(&self, algorithm: &str) -> Option<&str> {
        self.metadata.checksums.get(algorithm).map(String::as_str)
    }

    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.persistent_flags.contains(flag) || self.temporary_flags.contains(flag)
    }

    pub fn add_persistent_flag(&mut self, flag: impl Into<String>) {
        self.persistent_flags.insert(flag.into());
    }

    pub fn add_temporary_flag(&mut self, flag: impl Into<String>) {
        self.temporary_flags.insert(flag.into());
    }

    #[must_use]
    pub fn persistent_flags(&self) -> &AHashSet<String> {
        &self.persistent_flags
    }

    /// Overwrite this package's persistent flags wholesale — used when a
    /// substitute inherits the provenance of the package it replaces during
    /// upgrade/downgrade.
    pub fn set_persistent_flags(&mut self, flags: AHashSet<String>) {
        self.persistent_flags = flags;
    }

    /// Promote every temporary flag to persistent.
    pub fn commit(&mut self) {
        for flag in self.temporary_flags.drain() {
            self.persistent_flags.insert(flag);
        }
    }

    #[must_use]
    pub fn provides(&self) -> &[String] {
        &self.metadata.provides
    }

    #[must_use]
    pub fn depends(&self) -> &[String] {
        &self.metadata.depends
    }

    #[must_use]
    pub fn conflicts(&self) -> &[String] {
        &self.metadata.conflicts
    }

    #[must_use]
    pub fn replaces(&self) -> &[String] {
        &self.metadata.replaces
    }

    #[must_use]
    pub fn static_files(&self) -> &[String] {
        &self.metadata.files.r#static
    }

    /// Build a package from its nested-map coordinates plus its wire data.
    #[must_use]
    pub fn from_parts(name: impl Into<String>, version: impl Into<String>, architecture: impl Into<String>, data: PackageData) -> Self {
        let mut package = Self::new(name, version, architecture);
        package.metadata = PackageMetadata {
            checksums: data.checksums,
            files: data.files,
            depends: data.depends,
            conflicts: data.conflicts,
            replaces: data.replaces,
            provides: data.provides,
            groups: data.groups,
            information: data.information,
        };
        package.persistent_flags = data.flags.into_iter().collect();
        package
    }

    /// This package's data in the wire-format shape, without its
    /// name/version/architecture — those live in the containing map's keys.
    #[must_use]
    pub fn to_data(&self) -> PackageData {
        PackageData {
            checksums: self.metadata.checksums.clone(),
            files: self.metadata.files.clone(),
            depends: self.metadata.depends.clone(),
            conflicts: self.metadata.conflicts.clone(),
            replaces: self.metadata.replaces.clone(),
            provides: self.metadata.provides.clone(),
            groups: self.metadata.groups.clone(),
            flags: self.persistent_flags.iter().cloned().collect(),
            information: self.metadata.information.clone(),
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) {}", self.name, self.architecture, self.version)
    }
}

/// Wire-format package data as it appears nested under `name → version →
/// architecture` in a metadata file — no name/version/architecture fields of
/// its own, since those come from the map's keys rather than the data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageData {
    pub checksums: AHashMap<String, String>,
    #[serde(rename = "files")]
    pub files: Files,
    pub depends: Vec<String>,
    pub conflicts: Vec<String>,
    pub replaces: Vec<String>,
    pub provides: Vec<String>,
    pub groups: Vec<String>,
    pub flags: Vec<String>,
    pub information: Information,
}

/// `name → version → architecture → package-data`, the on-disk shape of
/// both repository and installed metadata files.
pub type MetadataMap = AHashMap<String, AHashMap<String, AHashMap<String, PackageData>>>;

/// Flatten a nested metadata map into packages. Each package's `repository`
/// is left at its default (empty string); filling it in from the file's
/// location is the caller's responsibility.
#[must_use]
pub fn flatten_metadata_map(map: MetadataMap) -> Vec<Package> {
    let mut packages = Vec::new();
    for (name, versions) in map {
        for (version, architectures) in versions {
            for (architecture, data) in architectures {
                packages.push(Package::from_parts(name.clone(), version.clone(), architecture, data));
            }
        }
    }
    packages
}

/// Nest `packages` into the `name → version → architecture → data` shape a
/// metadata file is written in.
#[must_use]
pub fn build_metadata_map(packages: &[Package]) -> MetadataMap {
    let mut map: MetadataMap = AHashMap::new();
    for package in packages {
        map.entry(package.name.clone())
            .or_default()
            .entry(package.version.clone())
            .or_default()
            .insert(package.architecture.clone(), package.to_data());
    }
    map
}

/// A name whose identity may be satisfied by any of several packages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VirtualPackage {
    pub name: String,
    pub providers: Vec<PackageKey>,
}

impl VirtualPackage {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            providers: Vec::new(),
        }
    }

    pub fn provided_by(&mut self, package: &Package) {
        let key = package.key();
        if !self.providers.contains(&key) {
            self.providers.push(key);
        }
    }
}

/// A named bundle of packages installed or uninstalled as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    pub name: String,
    pub members: Vec<PackageKey>,
}

impl Group {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn add(&mut self, package: &Package) {
        let key = package.key();
        if !self.members.contains(&key) {
            self.members.push(key);
        }
    }
}

/// The closed sum of unit kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    Package(Package),
    Virtual(VirtualPackage),
    Group(Group),
}

impl Unit {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Package(p) => &p.name,
            Self::Virtual(v) => &v.name,
            Self::Group(g) => &g.name,
        }
    }

    /// Unique-by-identity key within a [`crate::Set`]: `name:arch version`
    /// for packages, bare `name` for groups and virtuals.
    #[must_use]
    pub fn display_identity(&self) -> String {
        match self {
            Self::Package(p) => format!("{}:{} {}", p.name, p.architecture, p.version),
            Self::Virtual(v) => v.name.clone(),
            Self::Group(g) => g.name.clone(),
        }
    }

    #[must_use]
    pub fn as_package(&self) -> Option<&Package> {
        match self {
            Self::Package(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_package_mut(&mut self) -> Option<&mut Package> {
        match self {
            Self::Package(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_virtual(&self) -> Option<&VirtualPackage> {
        match self {
            Self::Virtual(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(g) => Some(g),
            _ => None,
        }
    }
}

impl From<Package> for Unit {
    fn from(p: Package) -> Self {
        Self::Package(p)
    }
}

impl From<VirtualPackage> for Unit {
    fn from(v: VirtualPackage) -> Self {
        Self::Virtual(v)
    }
}

impl From<Group> for Unit {
    fn from(g: Group) -> Self {
        Self::Group(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_display_matches_schema() {
        let p = Package::new("foo", "1.0", "amd64");
        assert_eq!(p.to_string(), "foo(amd64) 1.0");
    }

    #[test]
    fn flags_split_persistent_and_temporary_until_commit() {
        let mut p = Package::new("foo", "1.0", "amd64");
        p.add_temporary_flag(FLAG_INSTALLED_AS_DEPENDENCY);
        assert!(p.has_flag(FLAG_INSTALLED_AS_DEPENDENCY));
        assert!(!p.persistent_flags().contains(FLAG_INSTALLED_AS_DEPENDENCY));
        p.commit();
        assert!(p.persistent_flags().contains(FLAG_INSTALLED_AS_DEPENDENCY));
    }

    #[test]
    fn checksum_presence_and_lookup() {
        let mut p = Package::new("foo", "1.0", "amd64");
        assert!(!p.has_checksum(None));
        p.metadata.checksums.insert("sha1".into(), "abc123".into());
        assert!(p.has_checksum(None));
        assert!(p.has_checksum(Some("sha1")));
        assert!(!p.has_checksum(Some("sha256")));
        assert_eq!(p.checksum("sha1"), Some("abc123"));
    }

    #[test]
    fn unit_display_identity_differs_by_kind() {
        let p = Unit::Package(Package::new("foo", "1.0", "amd64"));
        assert_eq!(p.display_identity(), "foo:amd64 1.0");

        let g = Unit::Group(Group::new("bar"));
        assert_eq!(g.display_identity(), "bar");
    }
}
