//! HTTP gateway shared by the upstream clients
//!
//! One GET per call, JSON in, typed payload out. A non-2xx status, a
//! transport failure or a body that does not match the schema becomes a
//! [`FeedError`] carrying the endpoint path. Nothing is retried or cached.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::HttpConfig;
use crate::error::{DataSource, FeedError, Result};

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    feed: DataSource,
}

impl HttpGateway {
    /// Create a gateway for one upstream provider
    pub fn new(feed: DataSource, base_url: &str, http: &HttpConfig) -> Result<Self> {
        Self::with_headers(feed, base_url, http, HeaderMap::new())
    }

    /// Create a gateway that sends `headers` on every request
    pub fn with_headers(
        feed: DataSource,
        base_url: &str,
        http: &HttpConfig,
        mut headers: HeaderMap,
    ) -> Result<Self> {
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_seconds))
            .user_agent(http.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| FeedError::Config(format!("failed to create {feed} HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            feed,
        })
    }

    /// GET `{base_url}{path}` with `query` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(feed = %self.feed, endpoint = %path, "Fetching upstream payload");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport(path, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                feed = %self.feed,
                endpoint = %path,
                status = status.as_u16(),
                "Upstream request failed"
            );
            return Err(FeedError::Upstream {
                feed: self.feed,
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.transport(path, e))?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(feed = %self.feed, endpoint = %path, error = %e, "Upstream payload did not decode");
            FeedError::Decode {
                feed: self.feed,
                endpoint: path.to_string(),
                message: e.to_string(),
            }
        })
    }

    fn transport(&self, path: &str, error: reqwest::Error) -> FeedError {
        tracing::warn!(feed = %self.feed, endpoint = %path, error = %error, "Upstream transport error");
        FeedError::Transport {
            feed: self.feed,
            endpoint: path.to_string(),
            message: error.to_string(),
        }
    }
}

/// Single-entry header map for an API credential. The value is marked
/// sensitive so it never shows up in debug output.
pub fn credential_header(name: &'static str, value: &str) -> Result<HeaderMap> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| FeedError::Config(format!("invalid value for header {name}")))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(name), value);
    Ok(headers)
}
