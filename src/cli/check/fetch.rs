use std::path::Path;

use crate::adapter::outbound::HttpSignalSource;
use crate::config::Config;
use crate::domain::Snapshot;
use crate::error::Result;
use crate::port::SignalSource;

/// Fetch the feed once and report what a write would contain.
pub async fn execute_fetch<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let mut source = HttpSignalSource::from_config(&config)?;

    println!("Fetching {}", source.url());

    let body = match source.fetch().await {
        Ok(body) => body,
        Err(err) => {
            println!("✗ Fetch failed: {err}");
            return Err(err.into());
        }
    };

    let snapshot = Snapshot::from_raw(&body);
    println!("✓ Fetch succeeded");
    println!("  Bytes: {}", snapshot.text().len());
    println!("  Signals: {}", snapshot.signal_count());
    println!("  Fingerprint: {}", snapshot.fingerprint());

    Ok(())
}
