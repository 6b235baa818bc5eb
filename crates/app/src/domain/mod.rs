//! Condo Domain Concerns

pub mod announcements;
pub mod associations;
pub mod ledger;
pub mod projects;
pub mod schedules;
pub mod units;
pub mod users;
