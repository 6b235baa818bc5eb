//! Users
//!
//! Residents and administrators authenticate outside this crate; records only carry the
//! identifier of the acting or owning user.

use crate::uuids::TypedUuid;

/// External user marker.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
