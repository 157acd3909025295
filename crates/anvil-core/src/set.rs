//! `Set`: a unique-by-identity collection of units with targeted lookup.

use crate::relationship::{Op, Relationship};
use crate::unit::{Group, Package, Unit, VirtualPackage};
use crate::version;
use ahash::AHashMap;

/// A collection of units, keyed by [`Unit::display_identity`].
#[derive(Debug, Clone, Default)]
pub struct Set {
    units: AHashMap<String, Unit>,
}

impl Set {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `unit`, replacing any existing unit with the same identity.
    /// Returns `true` if this was a fresh insertion.
    pub fn insert(&mut self, unit: impl Into<Unit>) -> bool {
        let unit = unit.into();
        self.units.insert(unit.display_identity(), unit).is_none()
    }

    #[must_use]
    pub fn contains_identity(&self, identity: &str) -> bool {
        self.units.contains_key(identity)
    }

    pub fn remove(&mut self, identity: &str) -> Option<Unit> {
        self.units.remove(identity)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.units.values().filter_map(Unit::as_package)
    }

    pub fn virtuals(&self) -> impl Iterator<Item = &VirtualPackage> {
        self.units.values().filter_map(Unit::as_virtual)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.units.values().filter_map(Unit::as_group)
    }

    /// Is `package` (by full triple) a member of this set?
    #[must_use]
    pub fn contains_package(&self, name: &str, version: &str, arch: &str) -> bool {
        self.units.contains_key(&format!("{name}:{arch} {version}"))
    }

    /// Exact name lookup for a group or virtual.
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    pub fn get_named_mut(&mut self, name: &str) -> Option<&mut Unit> {
        self.units.get_mut(name)
    }

    /// Find a package in this set by name and architecture, returning the
    /// installed/available one whose version is highest.
    #[must_use]
    pub fn highest(&self, name: &str, arch: &str) -> Option<&Package> {
        self.packages()
            .filter(|p| p.name == name && p.architecture == arch)
            .max_by(|a, b| version::compare(&a.version, &b.version).cmp(&0))
    }

    /// `search(term)`: case-insensitive substring match over names, and over
    /// package tags.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Unit> {
        let term = term.to_lowercase();
        self.units
            .values()
            .filter(|u| {
                u.name().to_lowercase().contains(&term)
                    || u.as_package()
                        .is_some_and(|p| p.metadata.information.tags.iter().any(|t| t.to_lowercase().contains(&term)))
            })
            .collect()
    }

    /// `target(description)`: resolve a parsed relationship against this set.
    ///
    /// Resolution order: an exact package match (name + arch + version
    /// constraint, or the highest version satisfying the constraint),
    /// falling back to a virtual package or group of the same name. A bare
    /// name with no architecture matches any architecture.
    #[must_use]
    pub fn target(&self, rel: &Relationship) -> Option<&Unit> {
        if let Some(arch) = &rel.arch {
            if let Some(pkg) = self.best_package(&rel.name, arch, rel.constraint.as_ref()) {
                return self.units.get(&format!("{}:{} {}", pkg.name, pkg.architecture, pkg.version));
            }
        } else {
            let candidate = self
                .packages()
                .filter(|p| p.name == rel.name)
                .filter(|p| satisfies(p, rel.constraint.as_ref()))
                .max_by(|a, b| version::compare(&a.version, &b.version).cmp(&0));
            if let Some(pkg) = candidate {
                return self.units.get(&format!("{}:{} {}", pkg.name, pkg.architecture, pkg.version));
            }
        }
        self.units.get(&rel.name)
    }

    fn best_package(&self, name: &str, arch: &str, constraint: Option<&(Op, String)>) -> Option<&Package> {
        self.packages()
            .filter(|p| p.name == name && p.architecture == arch)
            .filter(|p| satisfies(p, constraint))
            .max_by(|a, b| version::compare(&a.version, &b.version).cmp(&0))
    }
}

fn satisfies(package: &Package, constraint: Option<&(Op, String)>) -> bool {
    let Some((op, version)) = constraint else {
        return true;
    };
    let cmp = version::compare(&package.version, version);
    match op {
        Op::Lt => cmp < 0,
        Op::Le => cmp <= 0,
        Op::Eq => cmp == 0,
        Op::Ge => cmp >= 0,
        Op::Gt => cmp > 0,
    }
}

impl FromIterator<Unit> for Set {
    fn from_iter<I: IntoIterator<Item = Unit>>(iter: I) -> Self {
        let mut set = Self::new();
        for unit in iter {
            set.insert(unit);
        }
        set
    }
}
