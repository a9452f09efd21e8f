//! Entitlement environment.
//!
//! Dependency-injection container for the lifecycle manager and resolver.

use crate::config::QuotaPolicy;
use crate::providers::{CatalogReader, NotificationSink, TicketStore};

/// External dependencies of the entitlement core.
///
/// # Type Parameters
///
/// - `T`: Ticket store (the one shared mutable resource)
/// - `C`: Catalog reader (read-only)
/// - `N`: Notification sink (best-effort)
#[derive(Clone)]
pub struct Environment<T, C, N>
where
    T: TicketStore + Clone,
    C: CatalogReader + Clone,
    N: NotificationSink + Clone,
{
    /// Ticket store.
    pub tickets: T,

    /// Catalog reader.
    pub catalog: C,

    /// Notification sink.
    pub notifier: N,

    /// Quota policy for mock packages.
    pub quota: QuotaPolicy,
}

impl<T, C, N> Environment<T, C, N>
where
    T: TicketStore + Clone,
    C: CatalogReader + Clone,
    N: NotificationSink + Clone,
{
    /// Create a new environment with the default quota policy.
    #[must_use]
    pub fn new(tickets: T, catalog: C, notifier: N) -> Self {
        Self {
            tickets,
            catalog,
            notifier,
            quota: QuotaPolicy::new(),
        }
    }

    /// Override the quota policy.
    #[must_use]
    pub fn with_quota(mut self, quota: QuotaPolicy) -> Self {
        self.quota = quota;
        self
    }
}
