//! Ticket lifecycle manager.
//!
//! Creates purchase tickets with uniqueness enforcement, drives the
//! `pending` → `approved` transition, deletes tickets, and serves the
//! administrator read views. Approval and the entitlement-cache grant are
//! one atomic unit inside [`TicketStore::approve_and_grant`]; notifications
//! are a best-effort side channel that never roll back a write.

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::error::{EntitlementError, Result};
use crate::providers::{CatalogReader, EmailMessage, NotificationSink, TicketStore};
use crate::state::{
    CourseId, Entitlement, NewTicket, PackageId, PackageType, Principal, Ticket, TicketId,
    TicketStatus,
};
use crate::utils::is_valid_email;

/// A ticket create request as submitted by a learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTicket {
    /// Requested course.
    pub course_id: CourseId,

    /// Requested package.
    pub package_id: PackageId,

    /// Payment method declared by the requester.
    pub paid_through: String,

    /// Amount paid, in minor currency units.
    pub price_paid: i64,

    /// Contact email; defaults to the principal's account email.
    pub email: Option<String>,

    /// Optional payment receipt reference.
    pub receipt: Option<String>,

    /// Mock units purchased; ignored unless the package is a mock package.
    pub mocks_purchased: Option<u32>,
}

/// Result of a successful create, including the notification outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTicket {
    /// The persisted ticket, in state `pending`.
    pub ticket: Ticket,

    /// Whether the confirmation notification was delivered. `false` is a
    /// warning, not a failure of the create itself.
    pub notification_sent: bool,
}

/// A ticket joined with catalog display attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketView {
    /// The ticket record.
    pub ticket: Ticket,

    /// Title of the requested course, when the catalog still has it.
    pub course_title: Option<String>,

    /// Name of the requested package, when the catalog still has it.
    pub package_name: Option<String>,
}

/// Ticket lifecycle manager.
///
/// All operations are invoked independently per inbound request; the
/// ticket store is the only shared mutable state.
#[derive(Clone)]
pub struct TicketLifecycle<T, C, N>
where
    T: TicketStore + Clone,
    C: CatalogReader + Clone,
    N: NotificationSink + Clone,
{
    env: Environment<T, C, N>,
}

impl<T, C, N> TicketLifecycle<T, C, N>
where
    T: TicketStore + Clone,
    C: CatalogReader + Clone,
    N: NotificationSink + Clone,
{
    /// Create a lifecycle manager over the given environment.
    #[must_use]
    pub const fn new(env: Environment<T, C, N>) -> Self {
        Self { env }
    }

    /// Create a new purchase ticket in state `pending`.
    ///
    /// The duplicate check and the insert are one atomic store operation;
    /// two concurrent creates for the same tuple yield exactly one success
    /// and one `Conflict`.
    ///
    /// # Errors
    ///
    /// - `Validation`: malformed email, empty payment method, negative
    ///   price, or a mock quantity/price that disagrees with the package's
    ///   price table
    /// - `NotFound`: course or package missing, or package not under course
    /// - `Conflict`: a ticket for this (requester, course, package) tuple
    ///   already exists, regardless of status
    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateTicket,
    ) -> Result<CreatedTicket> {
        let email = request
            .email
            .unwrap_or_else(|| principal.email.clone())
            .trim()
            .to_string();
        if !is_valid_email(&email) {
            return Err(EntitlementError::validation(
                "email",
                "must be a valid email address",
            ));
        }
        if request.paid_through.trim().is_empty() {
            return Err(EntitlementError::validation(
                "paid_through",
                "payment method is required",
            ));
        }
        if request.price_paid < 0 {
            return Err(EntitlementError::validation(
                "price_paid",
                "price must not be negative",
            ));
        }

        self.env.catalog.get_course(request.course_id).await?;
        let package = self.env.catalog.get_package(request.package_id).await?;
        if package.course_id != request.course_id {
            return Err(EntitlementError::not_found("package", request.package_id.0));
        }

        // Quantity is only meaningful for mock packages, and must match the
        // package's published price table when one exists.
        let mocks_purchased = match package.package_type {
            PackageType::Mock => {
                let quantity = request.mocks_purchased.unwrap_or(0);
                if i32::try_from(quantity).is_err() {
                    return Err(EntitlementError::validation(
                        "mocks_purchased",
                        "quantity is out of range",
                    ));
                }
                if quantity > 0 && !package.mock_prices.is_empty() {
                    let entry = package
                        .mock_prices
                        .iter()
                        .find(|p| p.quantity == quantity)
                        .ok_or_else(|| {
                            EntitlementError::validation(
                                "mocks_purchased",
                                format!("no price listed for quantity {quantity}"),
                            )
                        })?;
                    if entry.price != request.price_paid {
                        return Err(EntitlementError::validation(
                            "price_paid",
                            format!("expected {} for quantity {quantity}", entry.price),
                        ));
                    }
                }
                quantity
            }
            PackageType::Standard => 0,
        };

        let ticket = self
            .env
            .tickets
            .insert(&NewTicket {
                created_by: principal.id,
                email: email.clone(),
                course_id: request.course_id,
                package_id: request.package_id,
                paid_through: request.paid_through.trim().to_string(),
                price_paid: request.price_paid,
                receipt: request.receipt,
                mocks_purchased,
            })
            .await?;

        tracing::info!(
            ticket_id = %ticket.id.0,
            user_id = %principal.id.0,
            course_id = %ticket.course_id.0,
            package_id = %ticket.package_id.0,
            "purchase ticket created"
        );

        let notification_sent = self
            .notify(
                &email,
                "Your purchase request was received",
                format!(
                    "<p>We received your request for <b>{}</b>. You will get access once an administrator approves it.</p>",
                    package.name
                ),
            )
            .await;

        Ok(CreatedTicket {
            ticket,
            notification_sent,
        })
    }

    /// Approve a pending ticket and grant the entitlement.
    ///
    /// Admin-only and idempotent: re-approving an approved ticket is a
    /// no-op that never duplicates the requester's cache entry.
    ///
    /// # Errors
    ///
    /// - `Forbidden`: principal is not an admin
    /// - `NotFound`: no such ticket
    pub async fn approve(&self, principal: &Principal, ticket_id: TicketId) -> Result<Ticket> {
        if !principal.is_admin() {
            return Err(EntitlementError::Forbidden);
        }

        let ticket = self.env.tickets.approve_and_grant(ticket_id).await?;

        tracing::info!(
            ticket_id = %ticket.id.0,
            user_id = %ticket.created_by.0,
            "ticket approved, entitlement granted"
        );

        self.notify(
            &ticket.email,
            "Your purchase request was approved",
            "<p>Your course access has been granted. Happy learning!</p>".to_string(),
        )
        .await;

        Ok(ticket)
    }

    /// Delete a ticket from any state.
    ///
    /// Deletion is terminal and does NOT retract an entitlement-cache entry
    /// materialized by a prior approval; `audit_cache` reports such drift.
    ///
    /// # Errors
    ///
    /// - `Forbidden`: principal is not an admin
    /// - `NotFound`: no such ticket
    pub async fn delete(&self, principal: &Principal, ticket_id: TicketId) -> Result<()> {
        if !principal.is_admin() {
            return Err(EntitlementError::Forbidden);
        }

        self.env.tickets.delete(ticket_id).await?;
        tracing::info!(ticket_id = %ticket_id.0, "ticket deleted");
        Ok(())
    }

    /// List tickets by status, joined with catalog display attributes.
    ///
    /// Admin-only; defaults to the `pending` review queue.
    ///
    /// # Errors
    ///
    /// - `Forbidden`: principal is not an admin
    pub async fn list(
        &self,
        principal: &Principal,
        status: Option<TicketStatus>,
    ) -> Result<Vec<TicketView>> {
        if !principal.is_admin() {
            return Err(EntitlementError::Forbidden);
        }

        let tickets = self
            .env
            .tickets
            .list_by_status(status.unwrap_or(TicketStatus::Pending))
            .await?;
        self.into_views(tickets).await
    }

    /// List the caller's own approved tickets, with display attributes.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn list_mine(&self, principal: &Principal) -> Result<Vec<TicketView>> {
        let tickets = self.env.tickets.list_approved_for(principal.id).await?;
        self.into_views(tickets).await
    }

    /// Report entitlement-cache entries with no backing approved ticket.
    ///
    /// Read-only drift audit; it never repairs the cache. An empty result
    /// means the cache and the ticket records agree for this user.
    ///
    /// # Errors
    ///
    /// - `Forbidden`: principal is not an admin
    pub async fn audit_cache(
        &self,
        principal: &Principal,
        user_id: crate::state::UserId,
    ) -> Result<Vec<Entitlement>> {
        if !principal.is_admin() {
            return Err(EntitlementError::Forbidden);
        }

        let cache = self.env.tickets.entitlement_cache(user_id).await?;
        let approved = self.env.tickets.list_approved_for(user_id).await?;

        let orphaned: Vec<Entitlement> = cache
            .into_iter()
            .filter(|entry| {
                !approved
                    .iter()
                    .any(|t| t.course_id == entry.course_id && t.package_id == entry.package_id)
            })
            .collect();

        if !orphaned.is_empty() {
            let drift = EntitlementError::Inconsistency {
                user_id: user_id.0.to_string(),
                orphaned: orphaned.len(),
            };
            tracing::warn!(user_id = %user_id.0, error = %drift, "entitlement cache drift detected");
        }

        Ok(orphaned)
    }

    /// Best-effort notification; logs and reports `false` on failure.
    async fn notify(&self, to: &str, subject: &str, body: String) -> bool {
        let message = EmailMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            body,
        };
        match self.env.notifier.send(&message).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(to = %message.to, error = %err, "notification delivery failed");
                false
            }
        }
    }

    async fn into_views(&self, tickets: Vec<Ticket>) -> Result<Vec<TicketView>> {
        let mut views = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let course_title = match self.env.catalog.get_course(ticket.course_id).await {
                Ok(course) => Some(course.title),
                Err(EntitlementError::NotFound { .. }) => None,
                Err(err) => return Err(err),
            };
            let package_name = match self.env.catalog.get_package(ticket.package_id).await {
                Ok(package) => Some(package.name),
                Err(EntitlementError::NotFound { .. }) => None,
                Err(err) => return Err(err),
            };
            views.push(TicketView {
                ticket,
                course_title,
                package_name,
            });
        }
        Ok(views)
    }
}
