//! Announcement Records

use jiff::{Timestamp, civil::Date};
use serde::Serialize;

use crate::{domain::users::UserUuid, uuids::TypedUuid};

/// Announcement UUID
pub type AnnouncementUuid = TypedUuid<AnnouncementRecord>;

/// Announcement Record
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementRecord {
    pub uuid: AnnouncementUuid,
    pub title: String,
    pub body: String,
    pub published_on: Date,
    pub author_uuid: Option<UserUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
