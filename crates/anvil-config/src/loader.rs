//! Loading the configuration file from disk.

use crate::types::Configuration;
use crate::validate::validate;
use anvil_core::Result;
use std::path::Path;

/// Load and validate a configuration file.
pub fn load(path: &Path) -> Result<Configuration> {
    let config: Configuration = anvil_core::yaml::from_file(path)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_minimal_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!(
            "repositories:\n  main:\n    target: https://example.test/repo\n    handler: curl -sSfLo\narchitectures:\n  default: amd64\n  enabled:\n    - amd64\ngroups: null\ndb: {0}\nroot: {0}\n",
            dir.path().display()
        );
        let path = dir.path().join("config.yml");
        std::fs::write(&path, yaml).unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.architectures.default, "amd64");
        assert!(config.repositories.contains_key("main"));
    }
}
