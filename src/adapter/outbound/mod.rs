//! Outbound adapters: the HTTP feed and the snapshot file.

pub mod file;
pub mod http;

pub use file::{temp_path_for, write_atomic, AtomicFileSink};
pub use http::HttpSignalSource;
