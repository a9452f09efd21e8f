//! Console notification sink for development.

use crate::error::Result;
use crate::providers::{EmailMessage, NotificationSink};

/// Notification sink that logs messages instead of delivering them.
///
/// Useful in development when no SMTP relay is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotificationSink;

impl ConsoleNotificationSink {
    /// Create a new console sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl NotificationSink for ConsoleNotificationSink {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "notification (console sink, not delivered)"
        );
        Ok(())
    }
}
