//! Access checks and entitlement-shaped content listings.

use axum::{
    extract::{Query, State},
    Json,
};
use learngate_entitlements::providers::{CatalogReader, NotificationSink, TicketStore};
use learngate_entitlements::{Content, CourseId, PackageId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::AuthPrincipal;
use crate::state::AppState;

/// Query parameters naming a (course, package) pair.
#[derive(Debug, Deserialize)]
pub struct EntitlementQuery {
    /// Course to check.
    pub course_id: Uuid,
    /// Package to check.
    pub package_id: Uuid,
}

/// Response body for `GET /api/access`.
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    /// Whether the caller may access the pair.
    pub allowed: bool,
}

/// Response body for `GET /api/content`.
#[derive(Debug, Serialize)]
pub struct ContentResponse {
    /// Content visible to the caller, in display order.
    pub content: Vec<Content>,
}

/// Check whether the caller may access a course + package.
///
/// # Endpoint
///
/// ```text
/// GET /api/access?course_id=...&package_id=...
/// ```
pub async fn check_access<T, C, N>(
    State(state): State<Arc<AppState<T, C, N>>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<EntitlementQuery>,
) -> Result<Json<AccessResponse>, AppError>
where
    T: TicketStore + Clone + Send + Sync + 'static,
    C: CatalogReader + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let allowed = state
        .resolver
        .can_access(
            &principal,
            CourseId(query.course_id),
            PackageId(query.package_id),
        )
        .await?;
    Ok(Json(AccessResponse { allowed }))
}

/// List the content the caller may see for a course + package.
///
/// Mock packages come back sorted by `(week_no, lecture_no)` and truncated
/// to the caller's quota; standard packages return everything.
///
/// # Endpoint
///
/// ```text
/// GET /api/content?course_id=...&package_id=...
/// ```
///
/// # Status Codes
///
/// - 200 OK
/// - 403 Forbidden: no approved ticket for this pair
/// - 404 Not Found: unknown pair
pub async fn list_content<T, C, N>(
    State(state): State<Arc<AppState<T, C, N>>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<EntitlementQuery>,
) -> Result<Json<ContentResponse>, AppError>
where
    T: TicketStore + Clone + Send + Sync + 'static,
    C: CatalogReader + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let content = state
        .resolver
        .list_visible_content(
            &principal,
            CourseId(query.course_id),
            PackageId(query.package_id),
        )
        .await?;
    Ok(Json(ContentResponse { content }))
}
