//! Error types for entitlement and ticket lifecycle operations.

use thiserror::Error;

/// Result type alias for entitlement operations.
pub type Result<T> = std::result::Result<T, EntitlementError>;

/// Error taxonomy for the entitlement core.
///
/// Every error is terminal for the triggering call; the core never retries
/// internally. Callers (the HTTP layer) map these to transport responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    // ═══════════════════════════════════════════════════════════
    // Caller Errors
    // ═══════════════════════════════════════════════════════════

    /// Malformed or missing input field. Never partially applied.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending field.
        field: String,
        /// Field-level detail for the caller.
        message: String,
    },

    /// Referenced course, package, ticket, or user does not exist.
    #[error("{resource} {id} not found")]
    NotFound {
        /// Resource kind (e.g. "ticket", "course").
        resource: &'static str,
        /// Identifier that missed.
        id: String,
    },

    /// A ticket already exists for this (requester, course, package) tuple.
    #[error("A ticket for this course and package already exists")]
    Conflict,

    /// Authenticated but not entitled, or role insufficient for an
    /// admin-only operation.
    #[error("Forbidden")]
    Forbidden,

    // ═══════════════════════════════════════════════════════════
    // Side Channels
    // ═══════════════════════════════════════════════════════════

    /// Best-effort notification could not be delivered. Logged and surfaced
    /// as response metadata; never rolls back the primary operation.
    #[error("Notification delivery failed: {0}")]
    NotificationFailed(String),

    /// Detected mismatch between ticket state and a user's entitlement
    /// cache. Resolvable by reconciliation; never trusted at read time.
    #[error("Entitlement cache for user {user_id} has {orphaned} entries with no approved ticket")]
    Inconsistency {
        /// Affected user.
        user_id: String,
        /// Number of cache entries without a backing approved ticket.
        orphaned: usize,
    },

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Storage operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal invariant failure (not exposed to users in detail).
    #[error("Internal error")]
    Internal,
}

impl EntitlementError {
    /// Build a `Validation` error with field-level detail.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Build a `NotFound` error for a resource and identifier.
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Returns `true` if this error is due to the caller's input or
    /// standing, as opposed to a system failure.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::NotFound { .. } | Self::Conflict | Self::Forbidden
        )
    }
}
