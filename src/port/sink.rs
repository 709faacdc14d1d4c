//! Snapshot sink port.

use std::path::Path;

use crate::domain::Snapshot;
use crate::error::Result;

/// Destination for normalized snapshots.
///
/// A successful `write_snapshot` means a reader of the destination now
/// sees the complete new snapshot. A failed one means it still sees the
/// previous one.
pub trait SnapshotSink: Send {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Final location readers observe.
    fn destination(&self) -> &Path;
}
