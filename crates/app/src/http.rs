//! Shared HTTP plumbing for the storefront's remote resources.

use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use thiserror::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for reaching the storefront origin.
#[derive(Debug, Clone)]
pub struct StorefrontHttpConfig {
    /// Storefront origin, e.g. `"https://store.example.com"`.
    pub base_url: String,

    /// Upper bound for a single request, including reading the body.
    pub timeout: Duration,
}

impl StorefrontHttpConfig {
    /// Create a configuration for the given origin with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Join `path` onto the configured origin.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build the shared client.
    ///
    /// The cookie store keeps the shopper session across calls, which is what
    /// same-origin credentials amount to outside a browser.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn build_client(&self) -> Result<Client, HttpError> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        Ok(client)
    }
}

/// Errors that can occur when talking to the storefront.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Transport, timeout or body decoding failure.
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The storefront answered with a non-2xx status.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// Response status.
        status: StatusCode,

        /// Response body, if it could be read.
        body: String,
    },
}

impl HttpError {
    /// Whether the failure was the request running out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(source) if source.is_timeout())
    }
}

/// Turn any non-2xx response into an [`HttpError::UnexpectedStatus`].
///
/// # Errors
///
/// Returns an error when the status is not a success.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, HttpError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    Err(HttpError::UnexpectedStatus { status, body })
}
