//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   ┌──────────────┐      ┌─────────────┐      ┌──────────────┐
//!   │ SignalSource │ ───▶ │   Poller    │ ───▶ │ SnapshotSink │
//!   │  (HTTP feed) │      │ (app layer) │      │ (local file) │
//!   └──────────────┘      └─────────────┘      └──────────────┘
//! ```
//!
//! - [`SignalSource`] - Where raw feed text comes from
//! - [`SnapshotSink`] - Where normalized snapshots are published

mod sink;
mod source;

pub use sink::SnapshotSink;
pub use source::SignalSource;
