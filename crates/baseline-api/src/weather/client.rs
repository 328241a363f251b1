// Weather API HTTP client
//
// Wraps `reqwest::Client` with weatherapi.com URL construction and
// error-body extraction. The API key is passed per call so the caller can
// keep it in its own (secret) configuration.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use super::models::{CurrentResponse, CurrentWeather, ErrorResponse};
use crate::error::Error;
use crate::transport::{DEFAULT_TIMEOUT, TransportConfig};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

/// Raw HTTP client for the weatherapi.com REST API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl WeatherClient {
    /// Create a weather client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client pointed at the public endpoint with the default timeout.
    pub fn public() -> Result<Self, Error> {
        Self::new(Url::parse(DEFAULT_BASE_URL)?, &TransportConfig::default())
    }

    /// Create a weather client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Timeouts while sending or reading the body both surface as `Timeout`.
    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(e)
        }
    }

    /// Build `{base}/v1/current.json?key=..&q=..`.
    fn current_url(&self, api_key: &SecretString, location: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/v1/current.json"))?;
        url.query_pairs_mut()
            .append_pair("key", api_key.expose_secret())
            .append_pair("q", location);
        Ok(url)
    }

    /// Fetch current conditions for `location`.
    ///
    /// `GET /v1/current.json`
    pub async fn current(
        &self,
        api_key: &SecretString,
        location: &str,
    ) -> Result<CurrentWeather, Error> {
        let url = self.current_url(api_key, location)?;
        debug!(location, "fetching current weather");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if status != reqwest::StatusCode::OK {
            let status = status.as_u16();
            return Err(match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) if !err.error.message.is_empty() => Error::Api {
                    status,
                    message: err.error.message,
                },
                _ => Error::Status { status },
            });
        }

        let parsed: CurrentResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        Ok(parsed.into())
    }
}
