//! The poll-compare-write loop.
//!
//! Each cycle fetches the feed once. A failed fetch is logged and skipped.
//! A successful one is normalized and fingerprinted, and written only when
//! the fingerprint differs from the last snapshot written. Cycles are
//! separated by a fixed sleep. Shutdown is observed while fetching and
//! while sleeping, never in the middle of a write.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::OnWriteError;
use crate::domain::{Fingerprint, Snapshot};
use crate::error::{FetchError, Result};
use crate::port::{SignalSource, SnapshotSink};

/// Result of a single poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing usable came back; retry after the interval.
    FetchFailed,
    /// Content matched the last written snapshot; no write.
    Unchanged,
    /// A new snapshot was written.
    Written { signals: usize },
    /// Writing failed and the policy said to keep going.
    WriteFailed,
}

pub struct Poller<S, W> {
    source: S,
    sink: W,
    interval: Duration,
    on_write_error: OnWriteError,
    last_fingerprint: Option<Fingerprint>,
}

impl<S, W> Poller<S, W>
where
    S: SignalSource,
    W: SnapshotSink,
{
    pub fn new(source: S, sink: W, interval: Duration) -> Self {
        Self {
            source,
            sink,
            interval,
            on_write_error: OnWriteError::default(),
            last_fingerprint: None,
        }
    }

    #[must_use]
    pub fn with_write_policy(mut self, policy: OnWriteError) -> Self {
        self.on_write_error = policy;
        self
    }

    /// Fingerprint of the last snapshot successfully written, if any.
    pub fn last_fingerprint(&self) -> Option<Fingerprint> {
        self.last_fingerprint
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Run one fetch-compare-write cycle without sleeping.
    ///
    /// # Errors
    ///
    /// Only a write failure under [`OnWriteError::Abort`] is returned.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let fetched = self.source.fetch().await;
        self.handle_fetch(fetched)
    }

    /// Poll until `shutdown` flips to `true`.
    ///
    /// A closed shutdown channel means nobody can stop the loop any more,
    /// so it keeps running.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            source = %self.source.describe(),
            output = %self.sink.destination().display(),
            interval_secs = self.interval.as_secs_f64(),
            "Poller started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let fetched = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                fetched = self.source.fetch() => fetched,
            };
            self.handle_fetch(fetched)?;

            tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("Poller stopped");
        Ok(())
    }

    fn handle_fetch(
        &mut self,
        fetched: std::result::Result<String, FetchError>,
    ) -> Result<CycleOutcome> {
        match fetched {
            Ok(raw) => self.publish(&raw),
            Err(err) => {
                warn!(
                    source = %self.source.describe(),
                    error = %err,
                    "Fetch failed, retrying next cycle"
                );
                Ok(CycleOutcome::FetchFailed)
            }
        }
    }

    fn publish(&mut self, raw: &str) -> Result<CycleOutcome> {
        let snapshot = Snapshot::from_raw(raw);
        let fingerprint = snapshot.fingerprint();

        if self.last_fingerprint == Some(fingerprint) {
            info!("No change in signals (skip write)");
            return Ok(CycleOutcome::Unchanged);
        }

        if let Err(err) = self.sink.write_snapshot(&snapshot) {
            return match self.on_write_error {
                OnWriteError::Continue => {
                    error!(
                        output = %self.sink.destination().display(),
                        error = %err,
                        "Failed to write snapshot, will retry next cycle"
                    );
                    Ok(CycleOutcome::WriteFailed)
                }
                OnWriteError::Abort => Err(err),
            };
        }

        self.last_fingerprint = Some(fingerprint);
        let signals = snapshot.signal_count();
        debug!(%fingerprint, bytes = snapshot.text().len(), "Snapshot written");
        info!(
            output = %self.sink.destination().display(),
            signals,
            "Updated snapshot ({signals} signals)"
        );
        Ok(CycleOutcome::Written { signals })
    }
}

/// Resolve once the shutdown flag is `true`; never resolve if the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
