//! Units Data

use crate::domain::{
    units::records::{ProfileUuid, UnitTypeUuid, UnitUuid},
    users::UserUuid,
};

/// New Unit Type Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewUnitType {
    pub uuid: UnitTypeUuid,
    pub name: String,
    pub description: String,
}

/// New Unit Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewUnit {
    pub uuid: UnitUuid,

    /// Door number, unique among the association's live units.
    pub number: String,

    pub unit_type: UnitTypeUuid,
}

/// Unit Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct UnitUpdate {
    pub number: String,
    pub unit_type: UnitTypeUuid,
}

/// Unit listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitFilter {
    /// Restrict to units of this type.
    pub unit_type: Option<UnitTypeUuid>,
}

/// New Profile Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub uuid: ProfileUuid,
    pub user: UserUuid,
    pub unit: UnitUuid,
    pub phone: String,
    pub is_owner: bool,
}
