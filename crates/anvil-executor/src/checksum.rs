//! Streaming SHA-1 verification of archives against a package's declared
//! checksum.

use anvil_core::{Error, Result};
use digest::Digest;
use sha1::Sha1;
use std::io::Read;
use std::path::Path;

const BLOCK_SIZE: usize = 64 * 1024;

/// Compute the hex-encoded SHA-1 digest of a file's contents, reading it in
/// fixed-size blocks so the whole archive is never held in memory at once.
pub fn sha1_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; BLOCK_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(|e| Error::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Verify that `path`'s SHA-1 digest matches `expected`.
pub fn verify(path: &Path, expected: &str) -> Result<bool> {
    Ok(sha1_file(path)? == expected)
}
