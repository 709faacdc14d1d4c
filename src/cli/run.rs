//! Handler for the `run` command.

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use crate::adapter::outbound::{AtomicFileSink, HttpSignalSource};
use crate::app::Poller;
use crate::cli::RunArgs;
use crate::config::{Config, OnWriteError};
use crate::error::Result;

/// Load configuration and apply CLI overrides on top of it.
pub fn resolve_config(args: &RunArgs) -> Result<Config> {
    let mut config = Config::load_or_default(&args.config)?;

    if let Some(ref url) = args.url {
        config.source.url = url.clone();
    }
    if let Some(poll_secs) = args.poll_secs {
        config.polling.interval_secs = poll_secs;
    }
    if let Some(ref output) = args.output {
        config.output.path = output.clone();
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = resolve_config(args)?;
    config.init_logging();

    let output = config.output_path();
    info!("=== signalsync start ===");
    info!(base_dir = %config.base_dir().display(), "Base directory");
    info!(url = %config.source.url, "Server URL");
    info!(output = %output.display(), "Output file");

    let source = HttpSignalSource::from_config(&config)?;
    let sink = AtomicFileSink::new(output);
    sink.ensure_parent_dir()?;

    if args.once {
        // A single cycle has no "next cycle" to retry a failed write in.
        let mut poller = Poller::new(source, sink, config.poll_interval())
            .with_write_policy(OnWriteError::Abort);
        tokio::select! {
            outcome = poller.run_cycle() => {
                let outcome = outcome?;
                info!(?outcome, "Single cycle complete");
            }
            _ = signal::ctrl_c() => {
                info!("Interrupted by user (Ctrl+C), shutting down");
            }
        }
        return Ok(());
    }

    let mut poller = Poller::new(source, sink, config.poll_interval())
        .with_write_policy(config.output.on_write_error);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut poller_handle = tokio::spawn(async move { poller.run(shutdown_rx).await });

    tokio::select! {
        result = &mut poller_handle => {
            return map_poller_result(result);
        }
        _ = signal::ctrl_c() => {
            info!("Interrupted by user (Ctrl+C), shutting down");
            let _ = shutdown_tx.send(true);
        }
    }

    map_poller_result(poller_handle.await)?;
    info!("signalsync stopped");
    Ok(())
}

fn map_poller_result(
    result: std::result::Result<Result<()>, tokio::task::JoinError>,
) -> Result<()> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => {
            error!(error = %err, "Poller exited with error");
            Err(err)
        }
        Err(err) => {
            error!(error = %err, "Poller task join failed");
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::cli::{Cli, Commands};
    use crate::error::{ConfigError, Error};

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["signalsync", "run", "--config", "/nonexistent/signalsync.toml"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Run(args) => args,
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn cli_overrides_apply_over_defaults() {
        let args = run_args(&[
            "--url",
            "http://10.0.0.5:8000/signals",
            "--poll-secs",
            "2.5",
            "--output",
            "/tmp/x.csv",
            "--json-logs",
        ]);

        let config = resolve_config(&args).unwrap();

        assert_eq!(config.source.url, "http://10.0.0.5:8000/signals");
        assert_eq!(config.poll_interval(), Duration::from_millis(2500));
        assert_eq!(config.output_path(), PathBuf::from("/tmp/x.csv"));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = run_args(&["--poll-secs", "0"]);

        assert!(matches!(
            resolve_config(&args),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "interval_secs",
                ..
            }))
        ));
    }

    #[test]
    fn join_failure_maps_to_task_error() {
        let join_error = tokio_test::block_on(async {
            let handle = tokio::spawn(std::future::pending::<Result<()>>());
            handle.abort();
            handle.await.unwrap_err()
        });

        assert!(matches!(map_poller_result(Err(join_error)), Err(Error::Task(_))));
    }
}
