use std::path::Path;

use crate::config::Config;
use crate::error::Result;

/// Validate configuration without starting the poller.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());
    if !path.exists() {
        println!("  (file not found, using defaults)");
    }
    println!();

    let config = Config::load_or_default(path)?;

    println!("✓ Configuration is valid");
    println!();
    println!("Summary:");
    println!("  Server URL: {}", config.source.url);
    println!("  Poll interval: {}s", config.polling.interval_secs);
    println!("  HTTP timeout: {}s", config.http.timeout_secs);
    println!("  Lossy decode: {}", config.http.lossy_decode);
    println!("  Base directory: {}", config.base_dir().display());
    println!("  Output file: {}", config.output_path().display());
    println!("  On write error: {:?}", config.output.on_write_error);
    println!(
        "  Logging: {} ({})",
        config.logging.level, config.logging.format
    );

    Ok(())
}
