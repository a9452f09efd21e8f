//! Core domain types for the entitlement system.
//!
//! All types are `Clone` and serde-friendly so they can cross the store and
//! HTTP boundaries unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EntitlementError;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub uuid::Uuid);

impl UserId {
    /// Generate a new random `UserId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId(pub uuid::Uuid);

impl CourseId {
    /// Generate a new random `CourseId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for CourseId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a package within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(pub uuid::Uuid);

impl PackageId {
    /// Generate a new random `PackageId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for PackageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a purchase ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(pub uuid::Uuid);

impl TicketId {
    /// Generate a new random `TicketId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(pub uuid::Uuid);

impl ContentId {
    /// Generate a new random `ContentId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ContentId {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Principal
// ═══════════════════════════════════════════════════════════════════════

/// Role attached to an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular learner account.
    User,
    /// Administrator account.
    Admin,
}

impl Role {
    /// Wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse a role from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for anything other than `user` or `admin`.
    pub fn parse(value: &str) -> Result<Self, EntitlementError> {
        match value {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(EntitlementError::validation(
                "role",
                format!("unknown role `{other}`"),
            )),
        }
    }
}

/// Authenticated principal supplied by the external identity provider.
///
/// The core trusts this input and does not re-validate credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User ID.
    pub id: UserId,

    /// Role.
    pub role: Role,

    /// Account email, used as the default contact address on tickets.
    pub email: String,
}

impl Principal {
    /// Whether this principal holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Catalog Types
// ═══════════════════════════════════════════════════════════════════════

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course ID.
    pub id: CourseId,

    /// Course title.
    pub title: String,

    /// Course description.
    pub description: String,

    /// Cover image URL.
    pub image: String,

    /// Packages offered under this course.
    pub packages: Vec<PackageId>,
}

/// How a package's content is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// Plain content bundle with unrestricted access once entitled.
    Standard,
    /// Mock-test bundle sold by quantity; access is quota-limited.
    Mock,
}

impl PackageType {
    /// Wire representation of the package type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Mock => "mock",
        }
    }

    /// Parse a package type from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for unknown types; the resolver never silently
    /// defaults to either access policy.
    pub fn parse(value: &str) -> Result<Self, EntitlementError> {
        match value {
            "standard" => Ok(Self::Standard),
            "mock" => Ok(Self::Mock),
            other => Err(EntitlementError::validation(
                "package_type",
                format!("unknown package type `{other}`"),
            )),
        }
    }
}

/// One row of a mock package's quantity price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockPrice {
    /// Number of mock units purchased.
    pub quantity: u32,

    /// Price for that quantity, in minor currency units.
    pub price: i64,
}

/// A purchasable package belonging to exactly one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Package ID.
    pub id: PackageId,

    /// Owning course.
    pub course_id: CourseId,

    /// Display name.
    pub name: String,

    /// Base price in minor currency units.
    pub price: i64,

    /// Enrollment window start.
    pub start: DateTime<Utc>,

    /// Enrollment window end.
    pub end: DateTime<Utc>,

    /// How the package is sold.
    pub package_type: PackageType,

    /// Quantity price table; empty unless `package_type` is `Mock`.
    pub mock_prices: Vec<MockPrice>,
}

/// Type-specific payload of a content item.
///
/// Exactly one link per item; the legacy convention of carrying all three
/// link fields with empty-string placeholders is not representable here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "content_type", content = "link", rename_all = "lowercase")]
pub enum ContentLink {
    /// Downloadable PDF document.
    Pdf(String),
    /// Live meeting link.
    Zoom(String),
    /// Mock test link; items of this kind are quota-limited.
    Mock(String),
}

impl ContentLink {
    /// Wire representation of the content type discriminant.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf(_) => "pdf",
            Self::Zoom(_) => "zoom",
            Self::Mock(_) => "mock",
        }
    }

    /// The link carried by this variant.
    #[must_use]
    pub fn link(&self) -> &str {
        match self {
            Self::Pdf(link) | Self::Zoom(link) | Self::Mock(link) => link,
        }
    }

    /// Build a `ContentLink` from its stored discriminant and link.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an unknown discriminant.
    pub fn from_parts(content_type: &str, link: String) -> Result<Self, EntitlementError> {
        match content_type {
            "pdf" => Ok(Self::Pdf(link)),
            "zoom" => Ok(Self::Zoom(link)),
            "mock" => Ok(Self::Mock(link)),
            other => Err(EntitlementError::validation(
                "content_type",
                format!("unknown content type `{other}`"),
            )),
        }
    }
}

/// A content item belonging to exactly one (course, package) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Content ID.
    pub id: ContentId,

    /// Owning course.
    pub course_id: CourseId,

    /// Owning package.
    pub package_id: PackageId,

    /// Lecture topic.
    pub topic: String,

    /// Week ordering key.
    pub week_no: u32,

    /// Lecture ordering key within a week.
    pub lecture_no: u32,

    /// Type-specific payload, flattened to `content_type` + `link` on the
    /// wire.
    #[serde(flatten)]
    pub link: ContentLink,
}

// ═══════════════════════════════════════════════════════════════════════
// Tickets and Entitlements
// ═══════════════════════════════════════════════════════════════════════

/// Lifecycle state of a purchase ticket.
///
/// Tickets are created `Pending` and move to `Approved` exactly once. There
/// is no rejected state; rejection is modeled as deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Awaiting administrator review.
    Pending,
    /// Approved; the requester is entitled.
    Approved,
}

impl TicketStatus {
    /// Wire representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }

    /// Parse a status from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for anything other than `pending` or `approved`.
    pub fn parse(value: &str) -> Result<Self, EntitlementError> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            other => Err(EntitlementError::validation(
                "status",
                format!("unknown ticket status `{other}`"),
            )),
        }
    }
}

/// A purchase request moving through `pending` → `approved`.
///
/// The ticket record is the source of truth for entitlements; the per-user
/// cache is only a projection of approved tickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket ID.
    pub id: TicketId,

    /// Requesting user.
    pub created_by: UserId,

    /// Contact email on the request.
    pub email: String,

    /// Requested course.
    pub course_id: CourseId,

    /// Requested package.
    pub package_id: PackageId,

    /// Payment method declared by the requester.
    pub paid_through: String,

    /// Amount paid, in minor currency units.
    pub price_paid: i64,

    /// Optional payment receipt reference.
    pub receipt: Option<String>,

    /// Mock units purchased; 0 unless the package is a mock package.
    pub mocks_purchased: u32,

    /// Lifecycle state.
    pub status: TicketStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last transition timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Attributes of a ticket about to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    /// Requesting user.
    pub created_by: UserId,

    /// Contact email on the request.
    pub email: String,

    /// Requested course.
    pub course_id: CourseId,

    /// Requested package.
    pub package_id: PackageId,

    /// Payment method declared by the requester.
    pub paid_through: String,

    /// Amount paid, in minor currency units.
    pub price_paid: i64,

    /// Optional payment receipt reference.
    pub receipt: Option<String>,

    /// Mock units purchased.
    pub mocks_purchased: u32,
}

/// One entry of a user's entitlement cache: access to a course + package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entitlement {
    /// Course the entitlement grants access to.
    pub course_id: CourseId,

    /// Package the entitlement grants access to.
    pub package_id: PackageId,
}
