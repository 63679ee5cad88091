//! Error types for market data operations.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching market data.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Unexpected content type: {0}")]
    ContentType(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Exchange API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<FeedError>,
    },
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout(err.to_string())
        } else if err.is_decode() {
            FeedError::ParseError(err.to_string())
        } else {
            FeedError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::ParseError(err.to_string())
    }
}

impl From<url::ParseError> for FeedError {
    fn from(err: url::ParseError) -> Self {
        FeedError::InvalidUrl(err.to_string())
    }
}

impl FeedError {
    /// Returns true if the request may succeed when repeated.
    ///
    /// Malformed bodies and upstream error codes count as transient: the
    /// public endpoint occasionally serves error pages or throttling codes.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            FeedError::InvalidUrl(_) | FeedError::RetriesExhausted { .. }
        )
    }

    /// Returns a suggested minimum delay before retrying, if applicable.
    pub fn suggested_retry_delay(&self) -> Option<Duration> {
        match self {
            // 10006: too many visits
            FeedError::Api { code: 10006, .. } | FeedError::Status(429) => {
                Some(Duration::from_secs(1))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(FeedError::Http("reset".into()).is_transient());
        assert!(FeedError::Timeout("20s".into()).is_transient());
        assert!(FeedError::Status(502).is_transient());
        assert!(FeedError::ParseError("eof".into()).is_transient());
        assert!(FeedError::Api { code: 10001, message: "params error".into() }.is_transient());
        assert!(!FeedError::InvalidUrl("nope".into()).is_transient());

        let exhausted = FeedError::RetriesExhausted {
            attempts: 3,
            last: Box::new(FeedError::Status(500)),
        };
        assert!(!exhausted.is_transient());
    }

    #[test]
    fn test_rate_limit_delay() {
        assert_eq!(
            FeedError::Status(429).suggested_retry_delay(),
            Some(Duration::from_secs(1))
        );
        assert_eq!(FeedError::Status(500).suggested_retry_delay(), None);
    }

    #[test]
    fn test_exhausted_message_includes_last_error() {
        let err = FeedError::RetriesExhausted {
            attempts: 2,
            last: Box::new(FeedError::Status(503)),
        };
        assert_eq!(err.to_string(), "Gave up after 2 attempts: Unexpected HTTP status: 503");
    }
}
