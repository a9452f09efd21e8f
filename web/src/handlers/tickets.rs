//! Ticket lifecycle handlers.
//!
//! Learners create tickets and list their own; administrators review the
//! queue, approve, delete, and audit the entitlement cache. Authorization
//! decisions live in the core; these handlers only translate HTTP.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use learngate_entitlements::lifecycle::{CreateTicket, TicketView};
use learngate_entitlements::providers::{CatalogReader, NotificationSink, TicketStore};
use learngate_entitlements::{
    CourseId, Entitlement, PackageId, Ticket, TicketId, TicketStatus, UserId,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{AuthPrincipal, CorrelationId};
use crate::state::AppState;

/// Request body for `POST /api/tickets`.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    /// Requested course.
    pub course_id: Uuid,
    /// Requested package.
    pub package_id: Uuid,
    /// Payment method declared by the requester.
    pub paid_through: String,
    /// Amount paid, in minor currency units.
    pub price_paid: i64,
    /// Contact email; defaults to the account email.
    pub email: Option<String>,
    /// Optional payment receipt reference.
    pub receipt: Option<String>,
    /// Mock units purchased (mock packages only).
    pub mocks_purchased: Option<u32>,
}

/// Response body for `POST /api/tickets`.
#[derive(Debug, Serialize)]
pub struct CreateTicketResponse {
    /// The persisted ticket, in state `pending`.
    pub ticket: Ticket,
    /// Whether the confirmation notification was delivered.
    pub notification_sent: bool,
}

/// Query parameters for `GET /api/tickets`.
#[derive(Debug, Deserialize)]
pub struct ListTicketsQuery {
    /// Status filter (`pending` or `approved`); defaults to `pending`.
    pub status: Option<String>,
}

/// Response body for ticket listings.
#[derive(Debug, Serialize)]
pub struct TicketsResponse {
    /// Tickets joined with catalog display attributes.
    pub tickets: Vec<TicketView>,
}

/// Response body for `GET /api/users/{id}/entitlement-drift`.
#[derive(Debug, Serialize)]
pub struct DriftResponse {
    /// Cache entries with no backing approved ticket.
    pub orphaned: Vec<Entitlement>,
}

/// Create a new purchase ticket.
///
/// # Endpoint
///
/// ```text
/// POST /api/tickets
/// ```
///
/// # Status Codes
///
/// - 201 Created
/// - 409 Conflict: a ticket for this tuple already exists
/// - 422 Unprocessable Entity: malformed input
pub async fn create_ticket<T, C, N>(
    State(state): State<Arc<AppState<T, C, N>>>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<CreateTicketResponse>), AppError>
where
    T: TicketStore + Clone + Send + Sync + 'static,
    C: CatalogReader + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    tracing::debug!(
        correlation_id = %correlation_id.0,
        user_id = %principal.id.0,
        "ticket create request"
    );

    let created = state
        .lifecycle
        .create(
            &principal,
            CreateTicket {
                course_id: CourseId(request.course_id),
                package_id: PackageId(request.package_id),
                paid_through: request.paid_through,
                price_paid: request.price_paid,
                email: request.email,
                receipt: request.receipt,
                mocks_purchased: request.mocks_purchased,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTicketResponse {
            ticket: created.ticket,
            notification_sent: created.notification_sent,
        }),
    ))
}

/// List tickets by status (admin review queue).
///
/// # Endpoint
///
/// ```text
/// GET /api/tickets?status=pending
/// ```
pub async fn list_tickets<T, C, N>(
    State(state): State<Arc<AppState<T, C, N>>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Json<TicketsResponse>, AppError>
where
    T: TicketStore + Clone + Send + Sync + 'static,
    C: CatalogReader + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let status = query
        .status
        .as_deref()
        .map(TicketStatus::parse)
        .transpose()?;
    let tickets = state.lifecycle.list(&principal, status).await?;
    Ok(Json(TicketsResponse { tickets }))
}

/// List the caller's own approved tickets.
///
/// # Endpoint
///
/// ```text
/// GET /api/tickets/mine
/// ```
pub async fn list_my_tickets<T, C, N>(
    State(state): State<Arc<AppState<T, C, N>>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<Json<TicketsResponse>, AppError>
where
    T: TicketStore + Clone + Send + Sync + 'static,
    C: CatalogReader + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let tickets = state.lifecycle.list_mine(&principal).await?;
    Ok(Json(TicketsResponse { tickets }))
}

/// Approve a pending ticket and grant the entitlement.
///
/// Idempotent; re-approving an approved ticket returns the same state.
///
/// # Endpoint
///
/// ```text
/// PUT /api/tickets/{id}/approve
/// ```
pub async fn approve_ticket<T, C, N>(
    State(state): State<Arc<AppState<T, C, N>>>,
    AuthPrincipal(principal): AuthPrincipal,
    correlation_id: CorrelationId,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<Ticket>, AppError>
where
    T: TicketStore + Clone + Send + Sync + 'static,
    C: CatalogReader + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    tracing::debug!(
        correlation_id = %correlation_id.0,
        ticket_id = %ticket_id,
        "ticket approve request"
    );

    let ticket = state
        .lifecycle
        .approve(&principal, TicketId(ticket_id))
        .await?;
    Ok(Json(ticket))
}

/// Delete a ticket from any state.
///
/// # Endpoint
///
/// ```text
/// DELETE /api/tickets/{id}
/// ```
pub async fn delete_ticket<T, C, N>(
    State(state): State<Arc<AppState<T, C, N>>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(ticket_id): Path<Uuid>,
) -> Result<StatusCode, AppError>
where
    T: TicketStore + Clone + Send + Sync + 'static,
    C: CatalogReader + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    state
        .lifecycle
        .delete(&principal, TicketId(ticket_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Report a user's entitlement-cache entries with no approved ticket.
///
/// # Endpoint
///
/// ```text
/// GET /api/users/{id}/entitlement-drift
/// ```
pub async fn audit_user_cache<T, C, N>(
    State(state): State<Arc<AppState<T, C, N>>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(user_id): Path<Uuid>,
) -> Result<Json<DriftResponse>, AppError>
where
    T: TicketStore + Clone + Send + Sync + 'static,
    C: CatalogReader + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let orphaned = state
        .lifecycle
        .audit_cache(&principal, UserId(user_id))
        .await?;
    Ok(Json(DriftResponse { orphaned }))
}
