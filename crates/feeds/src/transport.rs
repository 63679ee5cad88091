//! HTTP transport for market data requests.

use crate::error::FeedError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const USER_AGENT: &str = "MacdScanner/1.0";

/// Performs a GET request and returns the decoded JSON body.
///
/// Implementations must reject non-200 responses, non-JSON content and
/// malformed bodies with a `FeedError`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, FeedError>;
}

/// reqwest-backed transport rooted at a base URL.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Create a transport for `base_url` (e.g., "https://api.bybit.com").
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FeedError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FeedError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, FeedError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "GET");

        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FeedError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("json") {
            return Err(FeedError::ContentType(content_type));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_without_trailing_slash() {
        let transport = ReqwestTransport::new("https://api.bybit.com", DEFAULT_TIMEOUT).unwrap();
        let url = transport.endpoint("/v5/market/kline").unwrap();
        assert_eq!(url.as_str(), "https://api.bybit.com/v5/market/kline");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let transport = ReqwestTransport::new("http://localhost:8080/proxy", DEFAULT_TIMEOUT).unwrap();
        let url = transport.endpoint("/v5/market/instruments-info").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v5/market/instruments-info");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ReqwestTransport::new("not a url", DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(FeedError::InvalidUrl(_))));
    }
}
