//! Axum HTTP layer for the Learngate entitlement core.
//!
//! This crate translates HTTP to the entitlement core and back. The core
//! owns validation, authorization, and the lifecycle rules; handlers only
//! parse requests, call into [`learngate_entitlements`], and map domain
//! errors to status codes.
//!
//! # Request Flow
//!
//! 1. **HTTP request** arrives at an Axum handler
//! 2. **`AuthPrincipal`** is extracted from the identity headers (401 if absent)
//! 3. **Handler** calls the lifecycle manager or resolver
//! 4. **Domain errors** convert to [`AppError`] and a JSON error body
//!
//! # Example
//!
//! ```ignore
//! use learngate_web::{router, AppState};
//! use learngate_entitlements::Environment;
//! use std::sync::Arc;
//!
//! let env = Environment::new(tickets, catalog, notifier);
//! let app = router(Arc::new(AppState::new(env)));
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{AuthPrincipal, CorrelationId};
pub use router::router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
