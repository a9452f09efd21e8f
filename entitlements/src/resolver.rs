//! Entitlement resolver.
//!
//! The query-time authorization check: combines role, ticket state,
//! package type, and quota into an access decision and a filtered content
//! list. Decisions always consult the ticket records; the denormalized
//! per-user cache is never an authorization input, so a deleted ticket
//! revokes access even while the cache still lists the pair.

use crate::environment::Environment;
use crate::error::{EntitlementError, Result};
use crate::providers::{CatalogReader, NotificationSink, TicketStore};
use crate::quota::visible_mock_count;
use crate::state::{Content, CourseId, PackageId, PackageType, Principal, Ticket};

/// Entitlement resolver over the environment's stores.
#[derive(Clone)]
pub struct EntitlementResolver<T, C, N>
where
    T: TicketStore + Clone,
    C: CatalogReader + Clone,
    N: NotificationSink + Clone,
{
    env: Environment<T, C, N>,
}

impl<T, C, N> EntitlementResolver<T, C, N>
where
    T: TicketStore + Clone,
    C: CatalogReader + Clone,
    N: NotificationSink + Clone,
{
    /// Create a resolver over the given environment.
    #[must_use]
    pub const fn new(env: Environment<T, C, N>) -> Self {
        Self { env }
    }

    /// Whether the principal may access the given course + package.
    ///
    /// Admins always pass. Users pass iff an approved ticket exists for the
    /// exact (user, course, package) tuple.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn can_access(
        &self,
        principal: &Principal,
        course_id: CourseId,
        package_id: PackageId,
    ) -> Result<bool> {
        if principal.is_admin() {
            return Ok(true);
        }
        Ok(self.entitling_ticket(principal, course_id, package_id).await?.is_some())
    }

    /// List the content the principal may see for a course + package.
    ///
    /// Mock packages are sorted ascending by `(week_no, lecture_no)` and
    /// truncated to the quota derived from the caller's approved ticket;
    /// admins see the full sorted set. Standard packages return the full
    /// content set in stored order.
    ///
    /// # Errors
    ///
    /// - `Forbidden`: no approved ticket for this tuple
    /// - `NotFound`: package does not exist under this course
    pub async fn list_visible_content(
        &self,
        principal: &Principal,
        course_id: CourseId,
        package_id: PackageId,
    ) -> Result<Vec<Content>> {
        let ticket = self.entitling_ticket(principal, course_id, package_id).await?;
        if !principal.is_admin() && ticket.is_none() {
            return Err(EntitlementError::Forbidden);
        }

        let package = self.env.catalog.get_package(package_id).await?;
        if package.course_id != course_id {
            return Err(EntitlementError::not_found("package", package_id.0));
        }

        let mut content = self.env.catalog.list_content(course_id, package_id).await?;

        match package.package_type {
            PackageType::Standard => Ok(content),
            PackageType::Mock => {
                content.sort_by_key(|c| (c.week_no, c.lecture_no));
                let visible = match ticket {
                    // Admins browse without a ticket; no quota applies.
                    None => content.len(),
                    Some(ticket) => visible_mock_count(
                        &self.env.quota,
                        ticket.mocks_purchased,
                        content.len(),
                    ),
                };
                content.truncate(visible);
                Ok(content)
            }
        }
    }

    /// The approved ticket backing this principal's access, if any.
    ///
    /// Reads ticket records only; deliberately ignores the entitlement
    /// cache (which may lag or drift).
    async fn entitling_ticket(
        &self,
        principal: &Principal,
        course_id: CourseId,
        package_id: PackageId,
    ) -> Result<Option<Ticket>> {
        self.env
            .tickets
            .find_approved(principal.id, course_id, package_id)
            .await
    }
}
