//! Notification sink trait.

use std::future::Future;

use crate::error::Result;
use crate::providers::EmailMessage;

/// Best-effort outbound notification delivery.
///
/// Delivery failure is reported to the caller as `NotificationFailed` but
/// never blocks or rolls back the entitlement write that triggered it.
pub trait NotificationSink: Send + Sync {
    /// Send one message.
    ///
    /// # Errors
    ///
    /// Returns `NotificationFailed` if:
    /// - The transport rejects the message
    /// - The recipient address cannot be parsed
    fn send(&self, message: &EmailMessage) -> impl Future<Output = Result<()>> + Send;
}
