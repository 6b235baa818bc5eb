//! Attachments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::projects::{
    data::NewAttachment,
    records::{AttachmentRecord, AttachmentUuid, ProjectUuid},
};

const CREATE_ATTACHMENT_SQL: &str = include_str!("../sql/create_attachment.sql");
const LIST_ATTACHMENTS_SQL: &str = include_str!("../sql/list_attachments.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAttachmentsRepository;

impl PgAttachmentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_attachment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: ProjectUuid,
        attachment: NewAttachment,
    ) -> Result<AttachmentRecord, sqlx::Error> {
        query_as::<Postgres, AttachmentRecord>(CREATE_ATTACHMENT_SQL)
            .bind(attachment.uuid.into_uuid())
            .bind(project.into_uuid())
            .bind(attachment.file_name)
            .bind(attachment.storage_path)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_attachments(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: ProjectUuid,
    ) -> Result<Vec<AttachmentRecord>, sqlx::Error> {
        query_as::<Postgres, AttachmentRecord>(LIST_ATTACHMENTS_SQL)
            .bind(project.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AttachmentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AttachmentUuid::from_uuid(row.try_get("uuid")?),
            project_uuid: ProjectUuid::from_uuid(row.try_get("project_uuid")?),
            file_name: row.try_get("file_name")?,
            storage_path: row.try_get("storage_path")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
