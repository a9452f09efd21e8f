//! Route table for the entitlement HTTP API.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use learngate_entitlements::providers::{CatalogReader, NotificationSink, TicketStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the application router over the given state.
///
/// All `/api` routes require the identity headers; `/health` does not.
pub fn router<T, C, N>(state: Arc<AppState<T, C, N>>) -> Router
where
    T: TicketStore + Clone + Send + Sync + 'static,
    C: CatalogReader + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/tickets",
            post(handlers::tickets::create_ticket::<T, C, N>)
                .get(handlers::tickets::list_tickets::<T, C, N>),
        )
        .route(
            "/api/tickets/mine",
            get(handlers::tickets::list_my_tickets::<T, C, N>),
        )
        .route(
            "/api/tickets/:id/approve",
            put(handlers::tickets::approve_ticket::<T, C, N>),
        )
        .route(
            "/api/tickets/:id",
            delete(handlers::tickets::delete_ticket::<T, C, N>),
        )
        .route(
            "/api/users/:id/entitlement-drift",
            get(handlers::tickets::audit_user_cache::<T, C, N>),
        )
        .route("/api/access", get(handlers::content::check_access::<T, C, N>))
        .route(
            "/api/content",
            get(handlers::content::list_content::<T, C, N>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
