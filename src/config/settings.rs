//! Application configuration loading and validation.
//!
//! Configuration is read from a TOML file in which every section is
//! optional. A few settings can be overridden from the environment (after
//! `.env` loading), and the CLI applies its own overrides on top.
//!
//! # Example
//!
//! ```no_run
//! use signalsync::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_or_default("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding `source.url`.
pub const ENV_URL: &str = "SIGNALSYNC_URL";
/// Environment variable overriding `polling.interval_secs`.
pub const ENV_POLL_SECS: &str = "SIGNALSYNC_POLL_SECS";
/// Environment variable overriding `output.path`.
pub const ENV_OUTPUT: &str = "SIGNALSYNC_OUTPUT";

/// Where the signal feed lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8000/signals".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Fixed delay between the end of one cycle and the start of the next.
    pub interval_secs: f64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_secs: 5.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Upper bound on a whole request, body included.
    pub timeout_secs: f64,
    /// Replace invalid UTF-8 with U+FFFD instead of failing the fetch.
    pub lossy_decode: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10.0,
            lossy_decode: false,
        }
    }
}

/// What the poller does when the snapshot file cannot be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnWriteError {
    /// Log, keep the previous fingerprint, and retry on the next cycle.
    #[default]
    Continue,
    /// Stop the poller and surface the error.
    Abort,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Snapshot file. Relative paths are resolved against the base directory.
    pub path: PathBuf,
    /// Base directory for relative paths. Defaults to the executable's directory.
    pub base_dir: Option<PathBuf>,
    pub on_write_error: OnWriteError,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("out").join("signals_out.csv"),
            base_dir: None,
            on_write_error: OnWriteError::Continue,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, an override cannot be
    /// parsed, or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |key| std::env::var(key).ok())
    }

    /// Like [`Config::parse_toml`], reading overrides through `lookup`.
    pub fn parse_toml_with_env<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    ///
    /// Environment overrides and validation apply in both cases.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL) {
            self.source.url = url;
        }
        if let Some(raw) = lookup(ENV_POLL_SECS) {
            self.polling.interval_secs =
                raw.trim()
                    .parse()
                    .map_err(|e: std::num::ParseFloatError| ConfigError::InvalidValue {
                        field: ENV_POLL_SECS,
                        reason: e.to_string(),
                    })?;
        }
        if let Some(path) = lookup(ENV_OUTPUT) {
            self.output.path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Called by the loaders; call again after applying CLI overrides.
    pub fn validate(&self) -> Result<()> {
        if self.source.url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "url" }.into());
        }
        let url = Url::parse(&self.source.url).map_err(|e| ConfigError::InvalidValue {
            field: "url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }
            .into());
        }
        validate_seconds("interval_secs", self.polling.interval_secs)?;
        validate_seconds("timeout_secs", self.http.timeout_secs)?;
        if self.output.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField { field: "path" }.into());
        }
        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected 'pretty' or 'json', got '{}'", self.logging.format),
            }
            .into());
        }
        Ok(())
    }

    /// Parsed feed URL.
    pub fn source_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.source.url)?)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.polling.interval_secs)
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.http.timeout_secs)
    }

    /// Directory that relative output paths are resolved against.
    ///
    /// Falls back to the executable's directory, then to the working
    /// directory when that cannot be determined.
    #[must_use]
    pub fn base_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.output.base_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Absolute (or base-relative) path of the snapshot file.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        if self.output.path.is_absolute() {
            self.output.path.clone()
        } else {
            self.base_dir().join(&self.output.path)
        }
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn validate_seconds(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be a positive number of seconds, got {value}"),
        }
        .into());
    }
    Ok(())
}
