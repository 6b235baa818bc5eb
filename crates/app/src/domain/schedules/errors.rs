//! Schedules service errors.

use condo::EmptyPoolError;
use jiff::civil::Date;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulesServiceError {
    #[error("schedule already exists")]
    AlreadyExists,

    #[error("schedule not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("rule is inactive")]
    Inactive,

    #[error("rule is not due on {0}")]
    NotDue(Date),

    #[error(transparent)]
    EmptyPool(#[from] EmptyPoolError),

    /// Output for the rule and date already exists. Firing operations turn this into a skip.
    #[error("already generated for this rule and date")]
    DuplicateGeneration,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SchedulesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
