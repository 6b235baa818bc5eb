//! Ledger
//!
//! Fees billed to units, deposits received from residents and withdrawals from the
//! association's funds.

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use errors::LedgerServiceError;
pub use service::*;
