//! SMTP notification sink using Lettre.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::error::{EntitlementError, Result};
use crate::providers::{EmailMessage, NotificationSink};

/// SMTP notification sink.
///
/// Sends real emails via SMTP, suitable for production use.
///
/// # Examples
///
/// ```ignore
/// use learngate_entitlements::providers::SmtpNotificationSink;
///
/// let sink = SmtpNotificationSink::new(
///     "smtp.example.com".to_string(),
///     465,
///     "noreply@example.com".to_string(),
///     "app_password".to_string(),
///     "noreply@example.com".to_string(),
///     "Learngate".to_string(),
/// );
/// ```
#[derive(Clone)]
pub struct SmtpNotificationSink {
    /// SMTP server address.
    smtp_server: String,

    /// SMTP server port.
    smtp_port: u16,

    /// SMTP credentials.
    credentials: Credentials,

    /// Sender email address.
    from_email: String,

    /// Sender display name.
    from_name: String,
}

impl SmtpNotificationSink {
    /// Create a new SMTP notification sink.
    #[must_use]
    pub fn new(
        smtp_server: String,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: String,
        from_email: String,
        from_name: String,
    ) -> Self {
        let credentials = Credentials::new(smtp_username, smtp_password);

        Self {
            smtp_server,
            smtp_port,
            credentials,
            from_email,
            from_name,
        }
    }

    /// Build SMTP transport for sending emails.
    ///
    /// A fresh transport per message avoids connection pooling issues.
    fn build_transport(&self) -> Result<SmtpTransport> {
        Ok(SmtpTransport::relay(&self.smtp_server)
            .map_err(|e| EntitlementError::NotificationFailed(format!("SMTP relay error: {e}")))?
            .port(self.smtp_port)
            .credentials(self.credentials.clone())
            .build())
    }

    /// Build the "From" header.
    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

impl NotificationSink for SmtpNotificationSink {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let email = Message::builder()
            .from(self.from_header().parse().map_err(|e| {
                EntitlementError::NotificationFailed(format!("Invalid from address: {e}"))
            })?)
            .to(message.to.parse().map_err(|e| {
                EntitlementError::NotificationFailed(format!("Invalid to address: {e}"))
            })?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.body.clone())
            .map_err(|e| {
                EntitlementError::NotificationFailed(format!("Failed to build email: {e}"))
            })?;

        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || {
            mailer.send(&email).map_err(|e| {
                EntitlementError::NotificationFailed(format!("Failed to send email: {e}"))
            })
        })
        .await
        .map_err(|e| EntitlementError::NotificationFailed(format!("Email task failed: {e}")))?
        .map(|_| ())
    }
}
