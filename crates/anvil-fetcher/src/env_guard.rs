//! A scoped overlay of the process environment, restored on drop.

#![allow(unsafe_code)]

use std::collections::BTreeMap;
use std::env;

/// Applies a repository's `env` overlay to the process environment for the
/// duration of its scope, restoring whatever was there before — including
/// removing a variable entirely if it was previously unset.
#[derive(Debug)]
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    /// Merge `overlay` into the process environment, remembering prior
    /// values so they can be restored on drop.
    #[must_use]
    pub fn apply(overlay: &BTreeMap<String, String>) -> Self {
        let mut previous = Vec::with_capacity(overlay.len());
        for (key, value) in overlay {
            previous.push((key.clone(), env::var(key).ok()));
            // SAFETY: single-threaded scheduling model; no concurrent env access.
            unsafe {
                env::set_var(key, value);
            }
        }
        Self { previous }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            // SAFETY: single-threaded scheduling model; no concurrent env access.
            unsafe {
                match value {
                    Some(value) => env::set_var(&key, value),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}
