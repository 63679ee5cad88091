//! Telegram alert delivery for MACD crossovers.
//!
//! This crate provides:
//! - The `AlertSink` delivery seam
//! - A Telegram Bot API notifier
//! - Alert message formatting

pub mod message;
pub mod notifier;
pub mod telegram;

pub use message::{format_alert_message, format_thousands};
pub use notifier::AlertSink;
pub use telegram::{TelegramConfig, TelegramNotifier};
