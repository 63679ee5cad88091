//! Alert delivery seam.

use async_trait::async_trait;

/// Delivers a formatted alert to the configured destination.
///
/// Delivery is best effort: implementations log failures and report them
/// through the return value instead of an error.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Returns true when the destination acknowledged the message.
    async fn notify(&self, message: &str) -> bool;
}
