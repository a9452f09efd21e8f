//! Mock notification sink for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{EntitlementError, Result};
use crate::providers::{EmailMessage, NotificationSink};

/// Mock notification sink.
///
/// Records sent messages and can be switched into a failing mode to test
/// the best-effort delivery contract.
#[derive(Debug, Clone, Default)]
pub struct MockNotificationSink {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    failing: Arc<AtomicBool>,
}

impl MockNotificationSink {
    /// Create a new mock sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn sent(&self) -> Vec<EmailMessage> {
        #[allow(clippy::unwrap_used)]
        let sent = self.sent.lock().unwrap().clone();
        sent
    }
}

impl NotificationSink for MockNotificationSink {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EntitlementError::NotificationFailed(
                "mock sink is failing".to_string(),
            ));
        }
        self.sent
            .lock()
            .map_err(|_| EntitlementError::Internal)?
            .push(message.clone());
        Ok(())
    }
}
