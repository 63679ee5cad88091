//! Telegram Bot API notifier.

use crate::notifier::AlertSink;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Telegram token or chat id not configured")]
    NotConfigured,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Telegram API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Telegram API rejected message: {0}")]
    Rejected(String),
}

/// Destination and credentials for the bot.
#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TelegramConfig {
    pub fn new(bot_token: Option<String>, chat_id: Option<String>) -> Self {
        Self {
            bot_token,
            chat_id,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(20),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Check a sendMessage response: HTTP 200 with `"ok": true`.
fn check_response(status: StatusCode, body: &str) -> Result<(), NotifyError> {
    if status != StatusCode::OK {
        return Err(NotifyError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        });
    }

    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| NotifyError::Rejected(format!("invalid response body: {e}")))?;
    if json["ok"].as_bool() == Some(true) {
        Ok(())
    } else {
        let description = json["description"].as_str().unwrap_or("ok=false");
        Err(NotifyError::Rejected(description.to_string()))
    }
}

/// Sends alerts to a single chat via the Bot API `sendMessage` method.
pub struct TelegramNotifier {
    config: TelegramConfig,
    http_client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self, NotifyError> {
        let http_client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Send a message, surfacing the failure reason.
    pub async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        let (token, chat_id) = match (&self.config.bot_token, &self.config.chat_id) {
            (Some(token), Some(chat_id)) => (token, chat_id),
            _ => return Err(NotifyError::NotConfigured),
        };

        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            token
        );
        let payload = SendMessage { chat_id, text };

        let response = self.http_client.post(&url).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await?;
        check_response(status, &body)
    }
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    async fn notify(&self, message: &str) -> bool {
        match self.send_message(message).await {
            Ok(()) => {
                debug!("Telegram message delivered");
                true
            }
            Err(NotifyError::NotConfigured) => {
                warn!("TELEGRAM_TOKEN/TELEGRAM_CHAT_ID not set, alert not delivered");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to send Telegram alert");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_response_ok() {
        let body = r#"{"ok":true,"result":{"message_id":7}}"#;
        assert!(check_response(StatusCode::OK, body).is_ok());
    }

    #[test]
    fn test_check_response_ok_false() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
        match check_response(StatusCode::OK, body) {
            Err(NotifyError::Rejected(msg)) => assert_eq!(msg, "Bad Request: chat not found"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_check_response_http_error() {
        let result = check_response(StatusCode::UNAUTHORIZED, r#"{"ok":false}"#);
        assert!(matches!(result, Err(NotifyError::Status { status: 401, .. })));
    }

    #[test]
    fn test_check_response_non_json() {
        let result = check_response(StatusCode::OK, "<html>");
        assert!(matches!(result, Err(NotifyError::Rejected(_))));
    }

    #[test]
    fn test_payload_shape() {
        let payload = SendMessage {
            chat_id: "618962376",
            text: "hello",
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({"chat_id": "618962376", "text": "hello"})
        );
    }

    #[test]
    fn test_config_debug_redacts_token() {
        let config = TelegramConfig::new(Some("secret-token".into()), Some("42".into()));
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(config.is_configured());
    }

    #[tokio::test]
    async fn test_notify_without_config_is_noop() {
        let notifier = TelegramNotifier::new(TelegramConfig::new(None, Some("42".into()))).unwrap();
        assert!(!notifier.notify("test").await);
        assert!(matches!(
            notifier.send_message("test").await,
            Err(NotifyError::NotConfigured)
        ));
    }
}
