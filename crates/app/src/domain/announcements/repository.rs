//! Announcements Repository

use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        announcements::{
            data::NewAnnouncement,
            records::{AnnouncementRecord, AnnouncementUuid},
        },
        users::UserUuid,
    },
    uuids::TypedUuid,
};

const CREATE_ANNOUNCEMENT_SQL: &str = include_str!("sql/create_announcement.sql");
const LIST_ANNOUNCEMENTS_SQL: &str = include_str!("sql/list_announcements.sql");
const DELETE_ANNOUNCEMENT_SQL: &str = include_str!("sql/delete_announcement.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAnnouncementsRepository;

impl PgAnnouncementsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_announcement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        announcement: NewAnnouncement,
    ) -> Result<AnnouncementRecord, sqlx::Error> {
        query_as::<Postgres, AnnouncementRecord>(CREATE_ANNOUNCEMENT_SQL)
            .bind(announcement.uuid.into_uuid())
            .bind(announcement.title)
            .bind(announcement.body)
            .bind(SqlxDate::from(announcement.published_on))
            .bind(announcement.author.map(TypedUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_announcements(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        as_of: Date,
    ) -> Result<Vec<AnnouncementRecord>, sqlx::Error> {
        query_as::<Postgres, AnnouncementRecord>(LIST_ANNOUNCEMENTS_SQL)
            .bind(SqlxDate::from(as_of))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_announcement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        announcement: AnnouncementUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ANNOUNCEMENT_SQL)
            .bind(announcement.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for AnnouncementRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AnnouncementUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            published_on: row.try_get::<SqlxDate, _>("published_on")?.to_jiff(),
            author_uuid: row
                .try_get::<Option<Uuid>, _>("author_uuid")?
                .map(UserUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
