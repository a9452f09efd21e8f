//! Mock ticket store for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::error::{EntitlementError, Result};
use crate::providers::TicketStore;
use crate::state::{
    CourseId, Entitlement, NewTicket, PackageId, Ticket, TicketId, TicketStatus, UserId,
};

/// Everything lives behind one lock so check-and-insert and the
/// approve-plus-grant pair are atomic, matching the storage contract.
#[derive(Debug, Default)]
struct Inner {
    tickets: HashMap<TicketId, Ticket>,
    caches: HashMap<UserId, Vec<Entitlement>>,
}

/// Mock ticket store.
///
/// Uses in-memory storage for testing.
#[derive(Debug, Clone, Default)]
pub struct MockTicketStore {
    inner: Arc<Mutex<Inner>>,
}

impl MockTicketStore {
    /// Create a new mock ticket store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a cache entry with no backing ticket, for drift tests.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn inject_cache_entry(&self, user_id: UserId, entitlement: Entitlement) {
        #[allow(clippy::unwrap_used)]
        let mut inner = self.inner.lock().unwrap();
        inner.caches.entry(user_id).or_default().push(entitlement);
    }
}

impl TicketStore for MockTicketStore {
    async fn insert(&self, ticket: &NewTicket) -> Result<Ticket> {
        let mut inner = self.inner.lock().map_err(|_| EntitlementError::Internal)?;

        let duplicate = inner.tickets.values().any(|existing| {
            existing.course_id == ticket.course_id
                && existing.package_id == ticket.package_id
                && (existing.created_by == ticket.created_by
                    || existing.email.eq_ignore_ascii_case(&ticket.email))
        });
        if duplicate {
            return Err(EntitlementError::Conflict);
        }

        let now = Utc::now();
        let stored = Ticket {
            id: TicketId::new(),
            created_by: ticket.created_by,
            email: ticket.email.clone(),
            course_id: ticket.course_id,
            package_id: ticket.package_id,
            paid_through: ticket.paid_through.clone(),
            price_paid: ticket.price_paid,
            receipt: ticket.receipt.clone(),
            mocks_purchased: ticket.mocks_purchased,
            status: TicketStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        inner.tickets.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn get(&self, ticket_id: TicketId) -> Result<Ticket> {
        let inner = self.inner.lock().map_err(|_| EntitlementError::Internal)?;
        inner
            .tickets
            .get(&ticket_id)
            .cloned()
            .ok_or_else(|| EntitlementError::not_found("ticket", ticket_id.0))
    }

    async fn approve_and_grant(&self, ticket_id: TicketId) -> Result<Ticket> {
        let mut inner = self.inner.lock().map_err(|_| EntitlementError::Internal)?;

        let ticket = inner
            .tickets
            .get_mut(&ticket_id)
            .ok_or_else(|| EntitlementError::not_found("ticket", ticket_id.0))?;

        if ticket.status != TicketStatus::Approved {
            ticket.status = TicketStatus::Approved;
            ticket.updated_at = Utc::now();
        }
        let ticket = ticket.clone();

        let entitlement = Entitlement {
            course_id: ticket.course_id,
            package_id: ticket.package_id,
        };
        let cache = inner.caches.entry(ticket.created_by).or_default();
        if !cache.contains(&entitlement) {
            cache.push(entitlement);
        }

        Ok(ticket)
    }

    async fn delete(&self, ticket_id: TicketId) -> Result<()> {
        let mut inner = self.inner.lock().map_err(|_| EntitlementError::Internal)?;
        // Deletion never retracts cache entries; that drift is observable
        // through entitlement_cache.
        inner
            .tickets
            .remove(&ticket_id)
            .map(|_| ())
            .ok_or_else(|| EntitlementError::not_found("ticket", ticket_id.0))
    }

    async fn list_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>> {
        let inner = self.inner.lock().map_err(|_| EntitlementError::Internal)?;
        let mut tickets: Vec<Ticket> = inner
            .tickets
            .values()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.created_at);
        Ok(tickets)
    }

    async fn list_approved_for(&self, user_id: UserId) -> Result<Vec<Ticket>> {
        let inner = self.inner.lock().map_err(|_| EntitlementError::Internal)?;
        let mut tickets: Vec<Ticket> = inner
            .tickets
            .values()
            .filter(|t| t.created_by == user_id && t.status == TicketStatus::Approved)
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.created_at);
        Ok(tickets)
    }

    async fn find_approved(
        &self,
        user_id: UserId,
        course_id: CourseId,
        package_id: PackageId,
    ) -> Result<Option<Ticket>> {
        let inner = self.inner.lock().map_err(|_| EntitlementError::Internal)?;
        Ok(inner
            .tickets
            .values()
            .find(|t| {
                t.created_by == user_id
                    && t.course_id == course_id
                    && t.package_id == package_id
                    && t.status == TicketStatus::Approved
            })
            .cloned())
    }

    async fn entitlement_cache(&self, user_id: UserId) -> Result<Vec<Entitlement>> {
        let inner = self.inner.lock().map_err(|_| EntitlementError::Internal)?;
        Ok(inner.caches.get(&user_id).cloned().unwrap_or_default())
    }
}
