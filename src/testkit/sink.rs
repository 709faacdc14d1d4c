//! In-memory [`SnapshotSink`] that records every write.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::Snapshot;
use crate::error::Result;
use crate::port::SnapshotSink;

/// Records written snapshot texts and can be told to fail upcoming writes.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    path: PathBuf,
    writes: Arc<Mutex<Vec<String>>>,
    pending_failures: Arc<AtomicUsize>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("memory://signals_out.csv"),
            writes: Arc::new(Mutex::new(Vec::new())),
            pending_failures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make the next `count` writes fail with an I/O error.
    pub fn fail_next(&self, count: usize) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("recording sink lock").clone()
    }

    pub fn last_write(&self) -> Option<String> {
        self.writes.lock().expect("recording sink lock").last().cloned()
    }
}

impl SnapshotSink for RecordingSink {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        let remaining = self.pending_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.pending_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(std::io::Error::other("scripted write failure").into());
        }
        self.writes
            .lock()
            .expect("recording sink lock")
            .push(snapshot.text().to_string());
        Ok(())
    }

    fn destination(&self) -> &Path {
        &self.path
    }
}
