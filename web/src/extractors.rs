//! Custom Axum extractors.
//!
//! This module contains the extractors shared by all handlers:
//! - `AuthPrincipal`: the authenticated identity forwarded by the gateway
//! - `CorrelationId`: extract or generate request correlation IDs
//!
//! # Examples
//!
//! ```ignore
//! use learngate_web::extractors::{AuthPrincipal, CorrelationId};
//!
//! async fn handler(
//!     AuthPrincipal(principal): AuthPrincipal,
//!     correlation_id: CorrelationId,
//! ) -> Result<Json<Response>, AppError> {
//!     tracing::info!(
//!         correlation_id = %correlation_id.0,
//!         user_id = %principal.id.0,
//!         "Processing request"
//!     );
//!     Ok(Json(response))
//! }
//! ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use learngate_entitlements::{Principal, Role, UserId};
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated user id (UUID).
pub const USER_ID_HEADER: &str = "X-User-Id";
/// Header carrying the authenticated role (`user` or `admin`).
pub const USER_ROLE_HEADER: &str = "X-User-Role";
/// Header carrying the authenticated account email.
pub const USER_EMAIL_HEADER: &str = "X-User-Email";

/// Authenticated principal forwarded by the identity gateway.
///
/// Authentication itself happens upstream; this service trusts the
/// `X-User-Id` / `X-User-Role` / `X-User-Email` headers stamped onto the
/// request. A missing or malformed header set rejects with 401.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        principal_from_headers(&parts.headers).map(Self)
    }
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Result<&'h str, AppError> {
    headers
        .get(name)
        .ok_or_else(|| AppError::unauthorized(format!("Missing {name} header")))?
        .to_str()
        .map_err(|_| AppError::unauthorized(format!("Malformed {name} header")))
}

fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, AppError> {
    let id = header_str(headers, USER_ID_HEADER)?;
    let id = Uuid::parse_str(id)
        .map_err(|_| AppError::unauthorized(format!("Malformed {USER_ID_HEADER} header")))?;

    let role = header_str(headers, USER_ROLE_HEADER)?;
    let role = Role::parse(role)
        .map_err(|_| AppError::unauthorized(format!("Malformed {USER_ROLE_HEADER} header")))?;

    let email = header_str(headers, USER_EMAIL_HEADER)?.trim().to_string();
    if email.is_empty() {
        return Err(AppError::unauthorized(format!(
            "Malformed {USER_EMAIL_HEADER} header"
        )));
    }

    Ok(Principal {
        id: UserId(id),
        role,
        email,
    })
}

/// Correlation ID for request tracing.
///
/// Extracts the correlation ID from the `X-Correlation-ID` header,
/// or generates a new UUID v4 if not present.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Try to extract from X-Correlation-ID header
        let correlation_id = parts
            .headers
            .get("X-Correlation-ID")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}
