//! Schedules Records

use std::cmp::Ordering;

use condo::{RecurrenceRule, RotationCandidate};
use jiff::{Timestamp, civil::Date};
use serde::Serialize;

use crate::{
    domain::{
        ledger::records::FeeRecord,
        units::records::{ProfileUuid, UnitTypeUuid, UnitUuid},
        users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Recurrent Fee UUID
pub type RecurrentFeeUuid = TypedUuid<RecurrentFeeRecord>;

/// Rotating Position UUID
pub type RotatingPositionUuid = TypedUuid<RotatingPositionRecord>;

/// Position UUID
pub type PositionUuid = TypedUuid<PositionRecord>;

/// Recurrent Fee Record
///
/// Bills every live unit of `unit_type_uuid` on each date the rule is due.
#[derive(Debug, Clone, Serialize)]
pub struct RecurrentFeeRecord {
    pub uuid: RecurrentFeeUuid,
    pub name: String,
    pub amount: u64,
    pub unit_type_uuid: UnitTypeUuid,
    pub rule: RecurrenceRule,
    pub active: bool,
    pub created_by: Option<UserUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Rotating Position Record
#[derive(Debug, Clone, Serialize)]
pub struct RotatingPositionRecord {
    pub uuid: RotatingPositionUuid,
    pub name: String,
    pub description: String,
    pub rule: RecurrenceRule,
    pub active: bool,

    /// Units whose residents take turns.
    pub unit_uuids: Vec<UnitUuid>,

    /// Profile selected by the latest firing.
    pub cursor_profile_uuid: Option<ProfileUuid>,

    pub created_by: Option<UserUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Position Record
///
/// A duty held by a resident on a date.
#[derive(Debug, Clone, Serialize)]
pub struct PositionRecord {
    pub uuid: PositionUuid,
    pub user_uuid: UserUuid,
    pub profile_uuid: ProfileUuid,
    pub date: Date,
    pub name: String,
    pub description: String,

    /// Generating rule, `None` for positions assigned by hand.
    pub rotating_position_uuid: Option<RotatingPositionUuid>,

    pub created_by: Option<UserUuid>,
    pub created_at: Timestamp,
}

/// Outcome of firing a recurrent fee.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeeGeneration {
    /// Fees created by this firing.
    pub created: Vec<FeeRecord>,

    /// Units that already had the fee for this date.
    pub skipped: usize,
}

/// Outcome of firing a rotating position.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "position", rename_all = "snake_case")]
pub enum PositionGeneration {
    Created(PositionRecord),

    /// A position already exists for the rule and date.
    AlreadyGenerated,
}

/// Resident eligible for a rotating position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationEntry {
    pub profile_uuid: ProfileUuid,
    pub user_uuid: UserUuid,
    pub unit_number: String,
    pub profile_created_at: Timestamp,
}

impl RotationCandidate for RotationEntry {
    type Ref = ProfileUuid;

    fn rotation_ref(&self) -> ProfileUuid {
        self.profile_uuid
    }

    fn rotation_order(&self, other: &Self) -> Ordering {
        cmp_unit_numbers(&self.unit_number, &other.unit_number)
            .then(self.profile_created_at.cmp(&other.profile_created_at))
            .then(self.profile_uuid.cmp(&other.profile_uuid))
    }
}

/// Door-number order: digit runs compare numerically, so "9" sorts before "10" and
/// "A2" before "A10". Numbers that only differ in leading zeros fall back to byte order.
fn cmp_unit_numbers(left: &str, right: &str) -> Ordering {
    let mut left_runs = digit_runs(left);
    let mut right_runs = digit_runs(right);

    loop {
        let ordering = match (left_runs.next(), right_runs.next()) {
            (None, None) => return left.cmp(right),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if is_digits(l) && is_digits(r) => {
                let (l, r) = (l.trim_start_matches('0'), r.trim_start_matches('0'));

                l.len().cmp(&r.len()).then_with(|| l.cmp(r))
            }
            (Some(l), Some(r)) => l.cmp(r),
        };

        if ordering.is_ne() {
            return ordering;
        }
    }
}

/// Split into alternating runs of ASCII digits and everything else.
fn digit_runs(value: &str) -> impl Iterator<Item = &str> {
    let mut rest = value;

    std::iter::from_fn(move || {
        let digits = rest.chars().next()?.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);

        rest = tail;

        Some(run)
    })
}

fn is_digits(run: &str) -> bool {
    run.starts_with(|c: char| c.is_ascii_digit())
}
