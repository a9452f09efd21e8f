//! PostgreSQL implementations of the provider traits.
//!
//! The schema (see `migrations/`) carries the concurrency contracts the
//! traits promise: unique indexes make ticket creation a conditional
//! insert, and approval runs one transaction over the ticket row and the
//! entitlement projection.

mod catalog;
mod ticket_store;

pub use catalog::PostgresCatalog;
pub use ticket_store::PostgresTicketStore;
