//! Units
//!
//! Unit types, the units of the building, and the resident profiles attached to them.

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use errors::UnitsServiceError;
pub use service::*;
