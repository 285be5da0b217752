//! Blocking HTTP access behind a small trait.
//!
//! The pipeline only ever issues `GET` requests and needs three things back:
//! the status code, the `Link` header (for pagination) and the body bytes.
//! [`HttpClient`] captures exactly that, so the contributor fetcher and the
//! avatar downloader stay testable without a network.
//!
//! The production implementation is [`ReqwestClient`], a thin wrapper over
//! `reqwest::blocking::Client`. Requests are issued one at a time and have no
//! timeout.

use reqwest::header::LINK;
use thiserror::Error;
use tracing::debug;

/// Sent on every request; GitHub rejects API calls without a user agent.
pub const USER_AGENT: &str = concat!("contrib-wall/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Could not read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The parts of an HTTP response the pipeline looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Raw `Link` header value, if present.
    pub link: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can perform a blocking `GET`.
pub trait HttpClient {
    /// Fetch `url`, sending the given extra headers.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, HttpError>;
}

/// [`HttpClient`] backed by `reqwest::blocking`.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(HttpError::Client)?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, HttpError> {
        debug!(url, "GET");
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().map_err(|source| HttpError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status().as_u16();
        let link = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .map_err(|source| HttpError::Body {
                url: url.to_string(),
                source,
            })?
            .to_vec();
        debug!(url, status, bytes = body.len(), "response");

        Ok(HttpResponse { status, link, body })
    }
}
