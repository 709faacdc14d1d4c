//! Signal source port.

use async_trait::async_trait;

use crate::error::FetchError;

/// Provider of raw signal feed text.
///
/// One call is one fetch attempt. Implementations must not retry
/// internally; the poller's fixed interval is the only retry mechanism.
#[async_trait]
pub trait SignalSource: Send {
    /// Fetch the current feed body as text.
    async fn fetch(&mut self) -> Result<String, FetchError>;

    /// Human-readable location of the feed, used in log lines.
    fn describe(&self) -> String;
}
