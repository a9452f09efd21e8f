//! Runtime selection of the notification transport.

use learngate_entitlements::providers::{
    ConsoleNotificationSink, EmailMessage, NotificationSink, SmtpNotificationSink,
};
use learngate_entitlements::Result;

use crate::config::SmtpConfig;

/// Notification sink chosen from configuration at startup.
///
/// SMTP when a relay host is configured, otherwise the console sink.
#[derive(Clone)]
pub enum Notifier {
    /// Real SMTP delivery.
    Smtp(SmtpNotificationSink),
    /// Log-only delivery for development.
    Console(ConsoleNotificationSink),
}

impl Notifier {
    /// Build the sink selected by the SMTP configuration.
    #[must_use]
    pub fn from_config(config: &SmtpConfig) -> Self {
        match &config.host {
            Some(host) => Self::Smtp(SmtpNotificationSink::new(
                host.clone(),
                config.port,
                config.username.clone(),
                config.password.clone(),
                config.from_email.clone(),
                config.from_name.clone(),
            )),
            None => Self::Console(ConsoleNotificationSink::new()),
        }
    }
}

impl NotificationSink for Notifier {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        match self {
            Self::Smtp(sink) => sink.send(message).await,
            Self::Console(sink) => sink.send(message).await,
        }
    }
}
