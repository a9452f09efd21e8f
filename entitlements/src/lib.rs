//! # Learngate Entitlements
//!
//! Entitlement resolution and purchase-ticket lifecycle for course content.
//!
//! A learner requests access to a course package by creating a **ticket**;
//! an administrator approves it, which durably grants the entitlement; the
//! **resolver** answers access queries and shapes content listings, with
//! quota truncation for mock-test packages.
//!
//! ## Guarantees
//!
//! - At most one ticket per (requester, course, package) tuple, enforced
//!   atomically at the storage layer
//! - Approval and the entitlement-cache grant are one atomic, idempotent
//!   unit
//! - Access decisions consult ticket records only; the denormalized cache
//!   is display-grade
//!
//! ## Example
//!
//! ```rust,ignore
//! use learngate_entitlements::{Environment, TicketLifecycle, EntitlementResolver};
//! use learngate_entitlements::mocks::{MockCatalog, MockNotificationSink, MockTicketStore};
//!
//! let env = Environment::new(
//!     MockTicketStore::new(),
//!     MockCatalog::new(),
//!     MockNotificationSink::new(),
//! );
//! let lifecycle = TicketLifecycle::new(env.clone());
//! let resolver = EntitlementResolver::new(env);
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod config;
pub mod environment;
pub mod error;
pub mod lifecycle;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
pub mod providers;
pub mod quota;
pub mod resolver;
pub mod state;
pub mod stores;
pub mod utils;

// Re-export main types for convenience
pub use config::QuotaPolicy;
pub use environment::Environment;
pub use error::{EntitlementError, Result};
pub use lifecycle::{CreateTicket, CreatedTicket, TicketLifecycle, TicketView};
pub use resolver::EntitlementResolver;
pub use state::{
    Content, ContentId, ContentLink, Course, CourseId, Entitlement, MockPrice, Package, PackageId,
    PackageType, Principal, Role, Ticket, TicketId, TicketStatus, UserId,
};
