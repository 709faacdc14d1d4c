//! Command-line interface definitions.

pub mod check;
pub mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// signalsync - Mirror a remote signal feed into a local CSV file.
#[derive(Parser, Debug)]
#[command(name = "signalsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the feed and keep the snapshot file up to date (foreground)
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `signalsync check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration and print the effective settings
    Config(ConfigPathArg),
    /// Fetch the feed once without writing anything
    Fetch(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file (defaults apply if it doesn't exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file (defaults apply if it doesn't exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override the feed URL
    #[arg(long)]
    pub url: Option<String>,

    /// Override the poll interval in seconds
    #[arg(long)]
    pub poll_secs: Option<f64>,

    /// Override the output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}
