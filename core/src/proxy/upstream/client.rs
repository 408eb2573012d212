//! Upstream client for calling detection and icon backends

use bytes::Bytes;
use reqwest::{header, Client, Response};
use tokio::time::Duration;

use crate::config::TimeoutsConfig;

/// Shared HTTP client for every backend call.
///
/// Exactly one request is issued per call; failures are never retried.
#[derive(Clone)]
pub struct UpstreamClient {
    http_client: Client,
}

impl UpstreamClient {
    pub fn new(timeouts: &TimeoutsConfig) -> reqwest::Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_timeout))
            .timeout(Duration::from_secs(timeouts.request_timeout))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(concat!("detector-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http_client })
    }

    /// GET a JSON document.
    pub async fn get_json(&self, url: &str) -> reqwest::Result<Response> {
        self.http_client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
    }

    /// POST an already-encoded body, keeping its content type (and multipart
    /// boundary) byte for byte.
    pub async fn post_raw(
        &self,
        url: &str,
        content_type: header::HeaderValue,
        body: Bytes,
    ) -> reqwest::Result<Response> {
        self.http_client
            .post(url)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
    }
}
