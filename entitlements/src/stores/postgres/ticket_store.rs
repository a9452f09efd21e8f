//! PostgreSQL ticket store implementation.
//!
//! Tickets and the per-user entitlement projection live in the same
//! database. Create relies on the unique indexes over the requester and
//! email tuples, so the existence check and the insert are one conditional
//! write. Approval updates the ticket row and upserts the projection row
//! inside a single transaction; `ON CONFLICT DO NOTHING` makes retries
//! converge without duplicating cache entries.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::{EntitlementError, Result};
use crate::providers::TicketStore;
use crate::state::{
    CourseId, Entitlement, NewTicket, PackageId, Ticket, TicketId, TicketStatus, UserId,
};

/// PostgreSQL ticket store.
#[derive(Clone)]
pub struct PostgresTicketStore {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresTicketStore {
    /// Create a new PostgreSQL ticket store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns error if migrations fail.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| EntitlementError::Database(format!("Migration failed: {e}")))?;
        Ok(())
    }
}

const TICKET_COLUMNS: &str = "id, created_by, email, course_id, package_id, paid_through, \
     price_paid, receipt, mocks_purchased, status, created_at, updated_at";

fn ticket_from_row(row: &PgRow) -> Result<Ticket> {
    let db_err = |e: sqlx::Error| EntitlementError::Database(format!("Failed to decode row: {e}"));
    let status: String = row.try_get("status").map_err(db_err)?;
    let mocks_purchased: i32 = row.try_get("mocks_purchased").map_err(db_err)?;

    Ok(Ticket {
        id: TicketId(row.try_get("id").map_err(db_err)?),
        created_by: UserId(row.try_get("created_by").map_err(db_err)?),
        email: row.try_get("email").map_err(db_err)?,
        course_id: CourseId(row.try_get("course_id").map_err(db_err)?),
        package_id: PackageId(row.try_get("package_id").map_err(db_err)?),
        paid_through: row.try_get("paid_through").map_err(db_err)?,
        price_paid: row.try_get("price_paid").map_err(db_err)?,
        receipt: row.try_get("receipt").map_err(db_err)?,
        mocks_purchased: u32::try_from(mocks_purchased)
            .map_err(|_| EntitlementError::Database("negative mocks_purchased".to_string()))?,
        status: TicketStatus::parse(&status)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

impl TicketStore for PostgresTicketStore {
    async fn insert(&self, ticket: &NewTicket) -> Result<Ticket> {
        let id = TicketId::new();
        // The lifecycle validates the quantity bound before it reaches us.
        let mocks_purchased = i32::try_from(ticket.mocks_purchased)
            .map_err(|_| EntitlementError::Database("mocks_purchased out of range".to_string()))?;
        let sql = format!(
            "INSERT INTO tickets \
                 (id, created_by, email, course_id, package_id, paid_through, \
                  price_paid, receipt, mocks_purchased, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending') \
             RETURNING {TICKET_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id.0)
            .bind(ticket.created_by.0)
            .bind(&ticket.email)
            .bind(ticket.course_id.0)
            .bind(ticket.package_id.0)
            .bind(&ticket.paid_through)
            .bind(ticket.price_paid)
            .bind(ticket.receipt.as_deref())
            .bind(mocks_purchased)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return EntitlementError::Conflict;
                    }
                }
                EntitlementError::Database(format!("Failed to insert ticket: {e}"))
            })?;

        ticket_from_row(&row)
    }

    async fn get(&self, ticket_id: TicketId) -> Result<Ticket> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(ticket_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EntitlementError::Database(format!("Failed to get ticket: {e}")))?
            .ok_or_else(|| EntitlementError::not_found("ticket", ticket_id.0))?;

        ticket_from_row(&row)
    }

    async fn approve_and_grant(&self, ticket_id: TicketId) -> Result<Ticket> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| EntitlementError::Database(format!("Failed to begin transaction: {e}")))?;

        let sql = format!(
            "UPDATE tickets \
             SET status = 'approved', \
                 updated_at = CASE WHEN status = 'approved' THEN updated_at ELSE now() END \
             WHERE id = $1 \
             RETURNING {TICKET_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(ticket_id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| EntitlementError::Database(format!("Failed to approve ticket: {e}")))?
            .ok_or_else(|| EntitlementError::not_found("ticket", ticket_id.0))?;
        let ticket = ticket_from_row(&row)?;

        sqlx::query(
            "INSERT INTO user_entitlements (user_id, course_id, package_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(ticket.created_by.0)
        .bind(ticket.course_id.0)
        .bind(ticket.package_id.0)
        .execute(&mut *tx)
        .await
        .map_err(|e| EntitlementError::Database(format!("Failed to grant entitlement: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| EntitlementError::Database(format!("Failed to commit approval: {e}")))?;

        Ok(ticket)
    }

    async fn delete(&self, ticket_id: TicketId) -> Result<()> {
        // Intentionally leaves any user_entitlements row in place; the
        // drift is reported by the cache audit, not silently repaired.
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(ticket_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| EntitlementError::Database(format!("Failed to delete ticket: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(EntitlementError::not_found("ticket", ticket_id.0));
        }
        Ok(())
    }

    async fn list_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>> {
        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE status = $1 ORDER BY created_at"
        );
        let rows = sqlx::query(&sql)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| EntitlementError::Database(format!("Failed to list tickets: {e}")))?;

        rows.iter().map(ticket_from_row).collect()
    }

    async fn list_approved_for(&self, user_id: UserId) -> Result<Vec<Ticket>> {
        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM tickets \
             WHERE created_by = $1 AND status = 'approved' \
             ORDER BY created_at"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| EntitlementError::Database(format!("Failed to list tickets: {e}")))?;

        rows.iter().map(ticket_from_row).collect()
    }

    async fn find_approved(
        &self,
        user_id: UserId,
        course_id: CourseId,
        package_id: PackageId,
    ) -> Result<Option<Ticket>> {
        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM tickets \
             WHERE created_by = $1 AND course_id = $2 AND package_id = $3 \
               AND status = 'approved'"
        );
        let row = sqlx::query(&sql)
            .bind(user_id.0)
            .bind(course_id.0)
            .bind(package_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EntitlementError::Database(format!("Failed to find ticket: {e}")))?;

        row.as_ref().map(ticket_from_row).transpose()
    }

    async fn entitlement_cache(&self, user_id: UserId) -> Result<Vec<Entitlement>> {
        let rows = sqlx::query(
            "SELECT course_id, package_id FROM user_entitlements \
             WHERE user_id = $1 \
             ORDER BY granted_at",
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EntitlementError::Database(format!("Failed to read entitlements: {e}")))?;

        rows.iter()
            .map(|row| {
                let db_err =
                    |e: sqlx::Error| EntitlementError::Database(format!("Failed to decode row: {e}"));
                Ok(Entitlement {
                    course_id: CourseId(row.try_get("course_id").map_err(db_err)?),
                    package_id: PackageId(row.try_get("package_id").map_err(db_err)?),
                })
            })
            .collect()
    }
}
