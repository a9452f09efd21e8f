//! Application state for Axum handlers.

use learngate_entitlements::providers::{CatalogReader, NotificationSink, TicketStore};
use learngate_entitlements::{EntitlementResolver, Environment, TicketLifecycle};

/// Application state shared across all HTTP handlers.
///
/// Generic over the provider implementations so the same handlers serve
/// PostgreSQL in production and the in-memory mocks in tests.
///
/// # Examples
///
/// ```ignore
/// use learngate_web::AppState;
/// use std::sync::Arc;
///
/// let env = Environment::new(tickets, catalog, notifier);
/// let state = Arc::new(AppState::new(env));
/// let app = router(state);
/// ```
#[derive(Clone)]
pub struct AppState<T, C, N>
where
    T: TicketStore + Clone,
    C: CatalogReader + Clone,
    N: NotificationSink + Clone,
{
    /// Ticket lifecycle manager.
    pub lifecycle: TicketLifecycle<T, C, N>,

    /// Entitlement resolver.
    pub resolver: EntitlementResolver<T, C, N>,
}

impl<T, C, N> AppState<T, C, N>
where
    T: TicketStore + Clone,
    C: CatalogReader + Clone,
    N: NotificationSink + Clone,
{
    /// Create the application state over one environment.
    #[must_use]
    pub fn new(env: Environment<T, C, N>) -> Self {
        Self {
            lifecycle: TicketLifecycle::new(env.clone()),
            resolver: EntitlementResolver::new(env),
        }
    }
}
