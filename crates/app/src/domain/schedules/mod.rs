//! Schedules
//!
//! Recurring fees and rotating duty positions. Each rule carries a [`condo::RecurrenceRule`];
//! firing a rule on a date it is due generates its fees or its next position exactly once.

pub mod data;
pub mod driver;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use driver::{DailyDriver, DriverReport, RuleFailure, RuleRef};
pub use errors::SchedulesServiceError;
pub use service::*;
