//! Ledger Data

use jiff::civil::Date;

use crate::domain::{
    ledger::records::{DepositUuid, FeeUuid, WithdrawalUuid},
    projects::records::ProjectUuid,
    units::records::UnitUuid,
    users::UserUuid,
};

/// New Fee Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewFee {
    pub uuid: FeeUuid,
    pub name: String,
    pub amount: u64,
    pub unit: UnitUuid,
    pub due_date: Date,
    pub created_by: Option<UserUuid>,
}

/// Fee listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeeFilter {
    pub unit: Option<UnitUuid>,
    pub due_on: Option<Date>,
}

/// New Deposit Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewDeposit {
    pub uuid: DepositUuid,

    /// Paying unit. Defaults to the fee's unit when a fee is given.
    pub unit: Option<UnitUuid>,

    pub fee: Option<FeeUuid>,
    pub amount: u64,
    pub deposited_on: Date,
    pub reference: String,
}

/// Deposit listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DepositFilter {
    pub fee: Option<FeeUuid>,
    pub unit: Option<UnitUuid>,
}

/// New Withdrawal Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewWithdrawal {
    pub uuid: WithdrawalUuid,
    pub amount: u64,
    pub withdrawn_on: Date,
    pub description: String,
    pub project: Option<ProjectUuid>,
}
