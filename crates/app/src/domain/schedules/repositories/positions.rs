//! Positions Repository

use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    domain::{
        schedules::{
            data::{NewPosition, PositionFilter},
            records::{
                PositionRecord, PositionUuid, RotatingPositionRecord, RotatingPositionUuid,
                RotationEntry,
            },
        },
        units::records::ProfileUuid,
        users::UserUuid,
    },
    uuids::TypedUuid,
};

const CREATE_POSITION_SQL: &str = include_str!("../sql/create_position.sql");
const CREATE_GENERATED_POSITION_SQL: &str = include_str!("../sql/create_generated_position.sql");
const POSITION_EXISTS_SQL: &str = include_str!("../sql/position_exists.sql");
const LIST_POSITIONS_SQL: &str = include_str!("../sql/list_positions.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPositionsRepository;

impl PgPositionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Returns `None` when the profile does not exist.
    pub(crate) async fn create_position(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        position: NewPosition,
    ) -> Result<Option<PositionRecord>, sqlx::Error> {
        query_as::<Postgres, PositionRecord>(CREATE_POSITION_SQL)
            .bind(position.uuid.into_uuid())
            .bind(position.profile.into_uuid())
            .bind(SqlxDate::from(position.date))
            .bind(position.name)
            .bind(position.description)
            .bind(position.created_by.map(TypedUuid::into_uuid))
            .fetch_optional(&mut **tx)
            .await
    }

    /// Returns `None` when the rule already has a position on `date`.
    pub(crate) async fn create_generated_position(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rule: &RotatingPositionRecord,
        holder: &RotationEntry,
        date: Date,
    ) -> Result<Option<PositionRecord>, sqlx::Error> {
        query_as::<Postgres, PositionRecord>(CREATE_GENERATED_POSITION_SQL)
            .bind(PositionUuid::new().into_uuid())
            .bind(holder.user_uuid.into_uuid())
            .bind(holder.profile_uuid.into_uuid())
            .bind(SqlxDate::from(date))
            .bind(&rule.name)
            .bind(&rule.description)
            .bind(rule.uuid.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn position_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rule: RotatingPositionUuid,
        date: Date,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(POSITION_EXISTS_SQL)
            .bind(rule.into_uuid())
            .bind(SqlxDate::from(date))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_positions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: PositionFilter,
    ) -> Result<Vec<PositionRecord>, sqlx::Error> {
        query_as::<Postgres, PositionRecord>(LIST_POSITIONS_SQL)
            .bind(filter.rotating_position.map(TypedUuid::into_uuid))
            .bind(filter.date.map(SqlxDate::from))
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PositionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PositionUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            profile_uuid: ProfileUuid::from_uuid(row.try_get("profile_uuid")?),
            date: row.try_get::<SqlxDate, _>("date")?.to_jiff(),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            rotating_position_uuid: row
                .try_get::<Option<Uuid>, _>("rotating_position_uuid")?
                .map(RotatingPositionUuid::from_uuid),
            created_by: row
                .try_get::<Option<Uuid>, _>("created_by")?
                .map(UserUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
