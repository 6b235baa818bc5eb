//! Schedules Data

use condo::RecurrenceRule;
use jiff::civil::Date;

use crate::domain::{
    schedules::records::{PositionUuid, RecurrentFeeUuid, RotatingPositionUuid},
    units::records::{ProfileUuid, UnitTypeUuid, UnitUuid},
    users::UserUuid,
};

/// New Recurrent Fee Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecurrentFee {
    pub uuid: RecurrentFeeUuid,
    pub name: String,
    pub amount: u64,
    pub unit_type: UnitTypeUuid,
    pub rule: RecurrenceRule,
    pub created_by: Option<UserUuid>,
}

/// New Rotating Position Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewRotatingPosition {
    pub uuid: RotatingPositionUuid,
    pub name: String,
    pub description: String,
    pub rule: RecurrenceRule,

    /// Units whose residents take turns. Repeated units count once.
    pub units: Vec<UnitUuid>,

    pub created_by: Option<UserUuid>,
}

/// New manually assigned Position Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPosition {
    pub uuid: PositionUuid,
    pub profile: ProfileUuid,
    pub date: Date,
    pub name: String,
    pub description: String,
    pub created_by: Option<UserUuid>,
}

/// Position listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionFilter {
    pub rotating_position: Option<RotatingPositionUuid>,
    pub date: Option<Date>,
}
