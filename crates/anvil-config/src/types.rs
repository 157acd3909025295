//! The configuration schema: enabled architectures, repository table, db
//! and root paths.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One entry in the `repositories` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub target: String,
    pub handler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
}

/// The `architectures` block: a default plus the enabled set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architectures {
    pub default: String,
    pub enabled: Vec<String>,
}

/// An immutable, validated configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub repositories: BTreeMap<String, RepositoryEntry>,
    pub architectures: Architectures,
    #[serde(default)]
    pub groups: Option<Vec<String>>,
    pub db: PathBuf,
    pub root: PathBuf,
}

impl Configuration {
    #[must_use]
    pub fn is_architecture_enabled(&self, architecture: &str) -> bool {
        self.architectures.enabled.iter().any(|a| a == architecture)
    }

    /// A Package is allowed iff its architecture is enabled; every other
    /// unit kind is unconditionally allowed.
    #[must_use]
    pub fn is_unit_allowed(&self, unit: &anvil_core::Unit) -> bool {
        match unit {
            anvil_core::Unit::Package(p) => self.is_architecture_enabled(&p.architecture),
            _ => true,
        }
    }

    #[must_use]
    pub fn available_dir(&self) -> PathBuf {
        self.db.join("available")
    }

    #[must_use]
    pub fn installed_dir(&self) -> PathBuf {
        self.db.join("installed")
    }

    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.db.join(".lock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_core::Package;

    fn sample() -> Configuration {
        Configuration {
            repositories: BTreeMap::new(),
            architectures: Architectures { default: "amd64".into(), enabled: vec!["amd64".into()] },
            groups: None,
            db: PathBuf::from("/db"),
            root: PathBuf::from("/"),
        }
    }

    #[test]
    fn package_allowed_iff_architecture_enabled() {
        let cfg = sample();
        let allowed = anvil_core::Unit::Package(Package::new("foo", "1.0", "amd64"));
        let disallowed = anvil_core::Unit::Package(Package::new("foo", "1.0", "i386"));
        assert!(cfg.is_unit_allowed(&allowed));
        assert!(!cfg.is_unit_allowed(&disallowed));
    }

    #[test]
    fn non_packages_are_always_allowed() {
        let cfg = sample();
        let group = anvil_core::Unit::Group(anvil_core::Group::new("tools"));
        assert!(cfg.is_unit_allowed(&group));
    }
}
