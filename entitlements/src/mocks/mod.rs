//! Mock providers for testing.
//!
//! In-memory, deterministic implementations of the provider traits. The
//! mock ticket store keeps tickets and entitlement caches behind one lock
//! so its `insert` and `approve_and_grant` honor the same atomicity
//! contract the PostgreSQL store enforces with indexes and transactions.

pub mod catalog;
pub mod email;
pub mod ticket_store;

pub use catalog::MockCatalog;
pub use email::MockNotificationSink;
pub use ticket_store::MockTicketStore;
