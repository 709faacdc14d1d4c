use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Reasons a single fetch from the signal feed produced no text.
///
/// None of these are fatal; the poller treats every variant as
/// "no update this cycle".
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("unexpected HTTP status: code={code}")]
    Status { code: u16 },

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: f64 },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("response body is not valid UTF-8: {0}")]
    Decode(#[source] std::string::FromUtf8Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("poller task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
