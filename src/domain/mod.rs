//! Exchange-independent snapshot types and pure text operations.

pub mod snapshot;

pub use snapshot::{count_signals, fingerprint, normalize, Fingerprint, Snapshot};
