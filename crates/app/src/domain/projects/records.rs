//! Projects Records

use jiff::{Timestamp, civil::Date};
use serde::Serialize;

use crate::{domain::users::UserUuid, uuids::TypedUuid};

/// Project UUID
pub type ProjectUuid = TypedUuid<ProjectRecord>;

/// Attachment UUID
pub type AttachmentUuid = TypedUuid<AttachmentRecord>;

/// Quotation UUID
pub type QuotationUuid = TypedUuid<QuotationRecord>;

/// Project Record
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRecord {
    pub uuid: ProjectUuid,
    pub name: String,
    pub description: String,
    pub owner_uuid: UserUuid,

    /// Budget in minor currency units.
    pub budget: u64,

    pub due_date: Date,
    pub delivered: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Attachment Record
///
/// Only the stored reference is kept; the file itself lives elsewhere.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentRecord {
    pub uuid: AttachmentUuid,
    pub project_uuid: ProjectUuid,
    pub file_name: String,
    pub storage_path: String,
    pub created_at: Timestamp,
}

/// Quotation Record
#[derive(Debug, Clone, Serialize)]
pub struct QuotationRecord {
    pub uuid: QuotationUuid,
    pub project_uuid: ProjectUuid,
    pub provider: String,
    pub submitted_by: UserUuid,
    pub price: u64,
    pub attachment_path: Option<String>,
    pub created_at: Timestamp,
}

/// Volunteer Record
#[derive(Debug, Clone, Serialize)]
pub struct VolunteerRecord {
    pub project_uuid: ProjectUuid,
    pub user_uuid: UserUuid,
    pub created_at: Timestamp,
}

/// Counted votes for a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub in_favour: u64,
    pub against: u64,
}

impl VoteTally {
    /// Whether more residents voted in favour than against.
    #[must_use]
    pub const fn approved(self) -> bool {
        self.in_favour > self.against
    }
}
