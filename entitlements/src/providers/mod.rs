//! Provider traits for the entitlement core's external collaborators.
//!
//! Providers are **interfaces**, not implementations. The lifecycle manager
//! and resolver depend on these traits; the runtime wires concrete
//! implementations.
//!
//! This enables:
//! - **Testing**: in-memory mocks, deterministic and fast
//! - **Production**: PostgreSQL stores, SMTP delivery
//!
//! The [`TicketStore`] is the only shared mutable resource in the system;
//! its `insert` and `approve_and_grant` contracts carry the atomicity the
//! lifecycle depends on, so the race-prone check-then-write never appears
//! at the call sites.

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod console;
pub mod email;
pub mod smtp;
pub mod ticket_store;

pub use catalog::CatalogReader;
pub use console::ConsoleNotificationSink;
pub use email::NotificationSink;
pub use smtp::SmtpNotificationSink;
pub use ticket_store::TicketStore;

/// An outbound notification message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,

    /// Subject line.
    pub subject: String,

    /// HTML body.
    pub body: String,
}
