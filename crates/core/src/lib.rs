//! Condo
//!
//! Scheduling and billing rules for a building association: recurrence rules that decide
//! when a recurring fee or duty falls due, round-robin duty rotation, and fee settlement
//! status. Everything here is pure; persistence lives in `condo-app`.

pub mod billing;
pub mod recurrence;
pub mod rotation;

pub use billing::{FeeBalance, FeeStatus};
pub use recurrence::{
    InvalidRuleError, MonthDaySet, MonthSet, RecurrenceRule, WeekdaySet, is_due,
};
pub use rotation::{EmptyPoolError, RotationCandidate, RotationPool, Selection, next_candidate};
