//! Announcements service.

use async_trait::async_trait;
use jiff::civil::Date;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        announcements::{
            data::NewAnnouncement,
            errors::AnnouncementsServiceError,
            records::{AnnouncementRecord, AnnouncementUuid},
            repository::PgAnnouncementsRepository,
        },
        associations::records::AssociationUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgAnnouncementsService {
    db: Db,
    repository: PgAnnouncementsRepository,
}

impl PgAnnouncementsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAnnouncementsRepository::new(),
        }
    }
}

#[async_trait]
impl AnnouncementsService for PgAnnouncementsService {
    #[tracing::instrument(
        name = "announcements.service.publish",
        skip(self, announcement),
        fields(association_uuid = %association, announcement_uuid = %announcement.uuid),
        err
    )]
    async fn publish(
        &self,
        association: AssociationUuid,
        announcement: NewAnnouncement,
    ) -> Result<AnnouncementRecord, AnnouncementsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self
            .repository
            .create_announcement(&mut tx, announcement)
            .await?;

        tx.commit().await?;

        info!(
            announcement_uuid = %created.uuid,
            published_on = %created.published_on,
            "published announcement"
        );

        Ok(created)
    }

    async fn list_announcements(
        &self,
        association: AssociationUuid,
        as_of: Date,
    ) -> Result<Vec<AnnouncementRecord>, AnnouncementsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let announcements = self.repository.list_announcements(&mut tx, as_of).await?;

        tx.commit().await?;

        Ok(announcements)
    }

    async fn delete_announcement(
        &self,
        association: AssociationUuid,
        announcement: AnnouncementUuid,
    ) -> Result<(), AnnouncementsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let rows_affected = self
            .repository
            .delete_announcement(&mut tx, announcement)
            .await?;

        if rows_affected == 0 {
            return Err(AnnouncementsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AnnouncementsService: Send + Sync {
    /// Publishes an announcement dated `published_on`.
    async fn publish(
        &self,
        association: AssociationUuid,
        announcement: NewAnnouncement,
    ) -> Result<AnnouncementRecord, AnnouncementsServiceError>;

    /// Announcements published on or before `as_of`, newest first.
    async fn list_announcements(
        &self,
        association: AssociationUuid,
        as_of: Date,
    ) -> Result<Vec<AnnouncementRecord>, AnnouncementsServiceError>;

    async fn delete_announcement(
        &self,
        association: AssociationUuid,
        announcement: AnnouncementUuid,
    ) -> Result<(), AnnouncementsServiceError>;
}
