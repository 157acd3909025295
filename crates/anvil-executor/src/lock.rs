//! An exclusive advisory lock on `<db>/.lock`, held for the duration of a
//! mutating operation. Readers (search) take no lock.

use anvil_config::Configuration;
use anvil_core::{Error, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};

/// Holds an exclusive lock on the db's lock file until dropped.
pub struct DbLock {
    file: File,
}

impl DbLock {
    /// Acquire the lock, blocking until any other holder releases it.
    pub fn acquire(config: &Configuration) -> Result<Self> {
        let path = config.lock_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let file = OpenOptions::new().create(true).write(true).open(&path).map_err(|e| Error::io(&path, e))?;
        file.lock_exclusive().map_err(|e| Error::io(&path, e))?;
        Ok(Self { file })
    }
}

impl Drop for DbLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_config::Architectures;
    use std::collections::BTreeMap;

    fn config(db: std::path::PathBuf) -> Configuration {
        Configuration {
            repositories: BTreeMap::new(),
            architectures: Architectures { default: "amd64".into(), enabled: vec!["amd64".into()] },
            groups: None,
            db,
            root: std::path::PathBuf::from("/"),
        }
    }

    #[test]
    fn acquiring_creates_the_lock_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("db"));
        let lock = DbLock::acquire(&config).unwrap();
        assert!(config.lock_path().is_file());
        drop(lock);
    }

    #[test]
    fn lock_can_be_reacquired_after_release() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("db"));
        let first = DbLock::acquire(&config).unwrap();
        drop(first);
        let second = DbLock::acquire(&config);
        assert!(second.is_ok());
    }
}
