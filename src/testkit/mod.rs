//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] — `ScriptedSource`, a replayable [`SignalSource`](crate::port::SignalSource).
//! - [`sink`] — `RecordingSink`, an in-memory [`SnapshotSink`](crate::port::SnapshotSink)
//!   with injectable write failures.
//! - [`http`] — `StubServer`, a tiny HTTP server with scripted replies.

pub mod http;
pub mod sink;
pub mod source;
