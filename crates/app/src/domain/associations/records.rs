//! Association Records

use jiff::Timestamp;
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Association UUID
pub type AssociationUuid = TypedUuid<AssociationRecord>;

/// Association Record
#[derive(Debug, Clone, Serialize)]
pub struct AssociationRecord {
    /// Unique association identifier.
    pub uuid: AssociationUuid,

    /// Human-readable association name.
    pub name: String,

    /// Creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,

    /// Soft-delete timestamp when deleted.
    pub deleted_at: Option<Timestamp>,
}
