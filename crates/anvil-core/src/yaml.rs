//! YAML document parsing, treated as "a function mapping a file to a tagged
//! document tree" — callers deserialize straight into typed structures.

use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Parse YAML text into `T`.
pub fn from_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_yaml::from_str(text).map_err(Error::from)
}

/// Read and parse a YAML file into `T`.
pub fn from_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    from_str(&text)
}

/// Serialize `value` to a YAML string.
pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(Error::from)
}

/// Serialize `value` to a YAML file, creating parent directories if needed.
pub fn to_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let text = to_string(value)?;
    std::fs::write(path, text).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Demo {
        name: String,
        count: u32,
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.yml");
        let value = Demo { name: "foo".into(), count: 3 };
        to_file(&path, &value).unwrap();
        let back: Demo = from_file(&path).unwrap();
        assert_eq!(value, back);
    }
}
