//! Condominium association records: persistence, services and the daily schedule driver.

pub mod context;
pub mod database;
pub mod domain;
pub mod logging;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
