//! Atomic snapshot file writer.
//!
//! Readers of the destination path only ever see the previous complete
//! snapshot or the new complete snapshot. The new contents go to a sibling
//! `<name>.tmp` file, are flushed to disk, and then renamed over the
//! destination.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::Snapshot;
use crate::error::Result;
use crate::port::SnapshotSink;

/// Sibling temp path used while writing `path`.
#[must_use]
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `contents` to `path` via write-to-temp-then-rename.
///
/// On failure the temp file is removed and `path` is left untouched.
///
/// Stays synchronous: the whole write happens inside a single poll of the
/// caller's task, so a shutdown signal can never cut it short.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let temp_path = temp_path_for(path);
    let mut file = fs::File::create(&temp_path)?;

    let cleanup_and_err = |e: std::io::Error| {
        let _ = fs::remove_file(&temp_path);
        e
    };

    file.write_all(contents.as_bytes()).map_err(cleanup_and_err)?;
    file.sync_all().map_err(cleanup_and_err)?;
    drop(file);

    fs::rename(&temp_path, path).map_err(cleanup_and_err)?;

    Ok(())
}

/// [`SnapshotSink`] that atomically replaces a single file.
#[derive(Debug, Clone)]
pub struct AtomicFileSink {
    path: PathBuf,
}

impl AtomicFileSink {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create the destination's parent directory if it doesn't exist.
    pub fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl SnapshotSink for AtomicFileSink {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        write_atomic(&self.path, snapshot.text())
    }

    fn destination(&self) -> &Path {
        &self.path
    }
}
