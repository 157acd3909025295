//! Gzip-compressed tar archive handling: file-manifest listing and
//! extraction relative to the managed root.

use anvil_core::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tar::Archive;

/// Entries the tool writes into every archive itself; present on disk after
/// extraction but excluded from the file manifest.
const CONTROL_ENTRIES: &[&str] = &[
    ".",
    "./.craft",
    "./.craft/postinst",
    "./.craft/postrm",
    "./.craft/preinst",
    "./.craft/prerm",
];

fn open(path: &Path) -> Result<Archive<GzDecoder<File>>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    Ok(Archive::new(GzDecoder::new(file)))
}

/// List the archive's entries, excluding control entries, in reverse
/// iteration order so directory children precede their parents.
pub fn list_files_reversed(path: &Path) -> Result<Vec<String>> {
    let mut archive = open(path)?;
    let mut names = Vec::new();
    for entry in archive.entries().map_err(|e| Error::io(path, e))? {
        let entry = entry.map_err(|e| Error::io(path, e))?;
        let name = entry.path().map_err(|e| Error::io(path, e))?.to_string_lossy().into_owned();
        if !CONTROL_ENTRIES.contains(&name.as_str()) {
            names.push(name);
        }
    }
    names.reverse();
    Ok(names)
}

/// Extract the archive into `destination`, including control entries.
pub fn extract(path: &Path, destination: &Path) -> Result<()> {
    let mut archive = open(path)?;
    archive.unpack(destination).map_err(|e| Error::io(path, e))
}

/// Serialize a reversed file list to the `files` manifest format: one path
/// per line.
#[must_use]
pub fn render_manifest(files: &[String]) -> String {
    let mut out = String::new();
    for file in files {
        out.push_str(file);
        out.push('\n');
    }
    out
}

/// Parse a `files` manifest back into its listed paths.
#[must_use]
pub fn parse_manifest(text: &str) -> Vec<String> {
    text.lines().filter(|l| !l.is_empty()).map(str::to_string).collect()
}
