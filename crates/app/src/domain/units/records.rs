//! Units Records

use jiff::Timestamp;
use serde::Serialize;

use crate::{domain::users::UserUuid, uuids::TypedUuid};

/// Unit Type UUID
pub type UnitTypeUuid = TypedUuid<UnitTypeRecord>;

/// Unit UUID
pub type UnitUuid = TypedUuid<UnitRecord>;

/// Profile UUID
pub type ProfileUuid = TypedUuid<ProfileRecord>;

/// Unit Type Record
#[derive(Debug, Clone, Serialize)]
pub struct UnitTypeRecord {
    pub uuid: UnitTypeUuid,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Unit Record
#[derive(Debug, Clone, Serialize)]
pub struct UnitRecord {
    pub uuid: UnitUuid,
    pub number: String,
    pub unit_type_uuid: UnitTypeUuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Profile Record
///
/// A resident (owner or tenant) of a unit.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRecord {
    pub uuid: ProfileUuid,
    pub user_uuid: UserUuid,
    pub unit_uuid: UnitUuid,
    pub phone: String,
    pub is_owner: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
