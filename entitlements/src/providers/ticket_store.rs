//! Ticket store trait.

use std::future::Future;

use crate::error::Result;
use crate::state::{
    CourseId, Entitlement, NewTicket, PackageId, Ticket, TicketId, TicketStatus, UserId,
};

/// Durable store of purchase tickets and the per-user entitlement cache.
///
/// The ticket record is the source of truth for entitlements. The cache is
/// a read-optimized projection mutated exclusively by
/// [`approve_and_grant`](TicketStore::approve_and_grant); query paths never
/// write it and access decisions never trust it alone.
pub trait TicketStore: Send + Sync {
    /// Insert a new ticket in state `pending`.
    ///
    /// Existence check and insert are one atomic operation: of two
    /// concurrent inserts for the same tuple, exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A ticket already exists for the same `(created_by, course,
    ///   package)` or `(email, course, package)` tuple, regardless of its
    ///   status → `Conflict`
    /// - Storage fails
    fn insert(&self, ticket: &NewTicket) -> impl Future<Output = Result<Ticket>> + Send;

    /// Get a ticket by ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ticket not found → `NotFound`
    /// - Storage fails
    fn get(&self, ticket_id: TicketId) -> impl Future<Output = Result<Ticket>> + Send;

    /// Set the ticket's status to `approved` and append the corresponding
    /// entry to the requester's entitlement cache, as one atomic unit.
    ///
    /// Idempotent: re-approving an already-approved ticket is a no-op and
    /// never duplicates the cache entry, so retries after a partial failure
    /// converge to the correct end state.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ticket not found → `NotFound`
    /// - Storage fails (neither write is visible)
    fn approve_and_grant(&self, ticket_id: TicketId)
    -> impl Future<Output = Result<Ticket>> + Send;

    /// Delete a ticket unconditionally, from any state.
    ///
    /// Does NOT retract an entitlement-cache entry materialized by a prior
    /// approval; callers must treat the cache as possibly stale and gate
    /// access on the ticket records.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ticket not found → `NotFound`
    /// - Storage fails
    fn delete(&self, ticket_id: TicketId) -> impl Future<Output = Result<()>> + Send;

    /// List tickets in the given status.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn list_by_status(
        &self,
        status: TicketStatus,
    ) -> impl Future<Output = Result<Vec<Ticket>>> + Send;

    /// List a user's approved tickets.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn list_approved_for(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Ticket>>> + Send;

    /// Find the approved ticket for an exact (user, course, package) tuple.
    ///
    /// This is the authorization read: it consults ticket records, never
    /// the entitlement cache.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn find_approved(
        &self,
        user_id: UserId,
        course_id: CourseId,
        package_id: PackageId,
    ) -> impl Future<Output = Result<Option<Ticket>>> + Send;

    /// Read a user's entitlement cache, in grant order.
    ///
    /// Display and drift-audit use only; never an authorization input.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn entitlement_cache(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Entitlement>>> + Send;
}
