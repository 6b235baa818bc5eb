//! Announcement Data

use jiff::civil::Date;

use crate::domain::{announcements::records::AnnouncementUuid, users::UserUuid};

/// New Announcement Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnnouncement {
    pub uuid: AnnouncementUuid,
    pub title: String,
    pub body: String,

    /// Announcements dated in the future stay hidden until that day.
    pub published_on: Date,

    pub author: Option<UserUuid>,
}
