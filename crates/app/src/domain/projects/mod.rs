//! Projects
//!
//! Maintenance projects with their attachments, provider quotations, resident votes and
//! volunteers.

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use errors::ProjectsServiceError;
pub use service::*;
