//! Atomic bucket file writes
//!
//! A crash during a write must never leave a corrupt or half-written
//! bucket in place. The full buffer is written to a sibling temp file
//! (same directory, so the final step is a rename on one filesystem)
//! and then renamed over the target, which atomically replaces any
//! existing file.
//!
//! Atomicity is scoped to "no half-written file": there is no fsync,
//! so a power loss before the rename lands may drop the new content
//! but still cannot corrupt the old.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Reserved marker prefixing in-progress temp files.
/// Not a hex digit, so a temp name can never collide with a bucket id.
pub const TEMP_PREFIX: char = '~';

/// Check whether a file name is a write-in-progress temp file
pub fn is_temp_name(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with(TEMP_PREFIX)
}

/// Sibling temp path for a target: `dir/name` → `dir/~name`
pub fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}{}", TEMP_PREFIX, name))
}

/// Write `bytes` to `path` atomically
///
/// Missing parent directories are created first. On return the target
/// either still holds its old content or holds the full new content.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp = temp_path(path);
    fs::write(&temp, bytes)?;
    fs::rename(&temp, path)?;

    Ok(())
}

/// Delete `path`, idempotent when it is already absent
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
