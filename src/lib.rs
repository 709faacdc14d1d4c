//! signalsync - Mirror a remote trading signal feed into a local CSV file.
//!
//! A trading terminal reads `out/signals_out.csv` on its own schedule. This
//! crate keeps that file in sync with a remote HTTP endpoint: it polls at a
//! fixed interval, normalizes the payload's line endings, and atomically
//! replaces the file only when the content actually changed.
//!
//! # Architecture
//!
//! The crate follows a small ports-and-adapters layout:
//!
//! - **`domain`** - Pure snapshot operations: normalize, fingerprint, count
//! - **`port`** - `SignalSource` and `SnapshotSink` traits
//! - **`adapter::outbound`** - HTTP feed client and atomic file writer
//! - **`app`** - The `Poller` loop tying a source to a sink
//!
//! # Modules
//!
//! - [`config`] - TOML configuration with environment overrides
//! - [`cli`] - Command-line interface (`run`, `check config`, `check fetch`)
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use signalsync::adapter::outbound::{AtomicFileSink, HttpSignalSource};
//! use signalsync::app::Poller;
//! use signalsync::config::Config;
//!
//! # async fn demo() -> signalsync::error::Result<()> {
//! let config = Config::load_or_default("config.toml")?;
//! let source = HttpSignalSource::from_config(&config)?;
//! let sink = AtomicFileSink::new(config.output_path());
//! let mut poller = Poller::new(source, sink, config.poll_interval());
//! poller.run_cycle().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
