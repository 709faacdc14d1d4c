//! HTTP signal feed client.
//!
//! One GET per fetch, bounded by the configured timeout. Only status 200
//! counts as success; the body is decoded as UTF-8 (strictly, unless lossy
//! decoding is enabled).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::port::SignalSource;

/// [`SignalSource`] backed by a plain HTTP GET.
pub struct HttpSignalSource {
    http: HttpClient,
    url: Url,
    timeout: Duration,
    lossy_decode: bool,
}

impl HttpSignalSource {
    /// Create a client for `url` with a whole-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            url,
            timeout,
            lossy_decode: false,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.source_url()?, config.http_timeout())?
            .with_lossy_decode(config.http.lossy_decode))
    }

    #[must_use]
    pub fn with_lossy_decode(mut self, lossy_decode: bool) -> Self {
        self.lossy_decode = lossy_decode;
        self
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                timeout_secs: self.timeout.as_secs_f64(),
            }
        } else {
            FetchError::Transport(err)
        }
    }

    fn decode(&self, body: Vec<u8>) -> std::result::Result<String, FetchError> {
        if self.lossy_decode {
            Ok(String::from_utf8_lossy(&body).into_owned())
        } else {
            String::from_utf8(body).map_err(FetchError::Decode)
        }
    }
}

#[async_trait]
impl SignalSource for HttpSignalSource {
    async fn fetch(&mut self) -> std::result::Result<String, FetchError> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        debug!(url = %self.url, bytes = body.len(), "Fetched signal feed");
        self.decode(body.to_vec())
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
