//! Ledger Records

use jiff::{Timestamp, civil::Date};
use serde::Serialize;

use crate::{
    domain::{
        projects::records::ProjectUuid, schedules::records::RecurrentFeeUuid,
        units::records::UnitUuid, users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Fee UUID
pub type FeeUuid = TypedUuid<FeeRecord>;

/// Deposit UUID
pub type DepositUuid = TypedUuid<DepositRecord>;

/// Withdrawal UUID
pub type WithdrawalUuid = TypedUuid<WithdrawalRecord>;

/// Fee Record
///
/// Amounts are minor currency units.
#[derive(Debug, Clone, Serialize)]
pub struct FeeRecord {
    pub uuid: FeeUuid,
    pub name: String,
    pub amount: u64,
    pub unit_uuid: UnitUuid,
    pub due_date: Date,

    /// Rule that generated the fee, `None` for fees entered by hand.
    pub recurrent_fee_uuid: Option<RecurrentFeeUuid>,

    pub created_by: Option<UserUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Deposit Record
#[derive(Debug, Clone, Serialize)]
pub struct DepositRecord {
    pub uuid: DepositUuid,
    pub unit_uuid: Option<UnitUuid>,
    pub fee_uuid: Option<FeeUuid>,
    pub amount: u64,
    pub deposited_on: Date,
    pub reference: String,
    pub created_at: Timestamp,
}

/// Withdrawal Record
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalRecord {
    pub uuid: WithdrawalUuid,
    pub amount: u64,
    pub withdrawn_on: Date,
    pub description: String,
    pub project_uuid: Option<ProjectUuid>,
    pub created_at: Timestamp,
}

/// Totals of money in and out up to a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub deposited: u64,
    pub withdrawn: u64,
}

impl Balance {
    /// Funds on hand; negative when withdrawals exceed deposits.
    #[must_use]
    pub fn net(self) -> i128 {
        i128::from(self.deposited) - i128::from(self.withdrawn)
    }
}
