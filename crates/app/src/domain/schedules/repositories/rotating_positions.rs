//! Rotating Positions Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        schedules::{
            data::NewRotatingPosition,
            records::{RotatingPositionRecord, RotatingPositionUuid, RotationEntry},
        },
        units::records::{ProfileUuid, UnitUuid},
        users::UserUuid,
    },
    uuids::TypedUuid,
};

use super::try_get_rule;

const CREATE_ROTATING_POSITION_SQL: &str = include_str!("../sql/create_rotating_position.sql");
const ADD_ROTATING_POSITION_UNITS_SQL: &str =
    include_str!("../sql/add_rotating_position_units.sql");
const GET_ROTATING_POSITION_SQL: &str = include_str!("../sql/get_rotating_position.sql");
const LOCK_ROTATING_POSITION_SQL: &str = include_str!("../sql/lock_rotating_position.sql");
const LIST_ROTATING_POSITIONS_SQL: &str = include_str!("../sql/list_rotating_positions.sql");
const SET_ROTATING_POSITION_ACTIVE_SQL: &str =
    include_str!("../sql/set_rotating_position_active.sql");
const SET_ROTATION_CURSOR_SQL: &str = include_str!("../sql/set_rotation_cursor.sql");
const LIST_ROTATION_POOL_SQL: &str = include_str!("../sql/list_rotation_pool.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRotatingPositionsRepository;

impl PgRotatingPositionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_rotating_position(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        position: NewRotatingPosition,
    ) -> Result<RotatingPositionRecord, sqlx::Error> {
        query(CREATE_ROTATING_POSITION_SQL)
            .bind(position.uuid.into_uuid())
            .bind(position.name)
            .bind(position.description)
            .bind(position.rule.weekdays().to_values())
            .bind(position.rule.monthdays().to_values())
            .bind(position.rule.months().to_values())
            .bind(position.created_by.map(TypedUuid::into_uuid))
            .execute(&mut **tx)
            .await?;

        let mut units: Vec<Uuid> = position
            .units
            .into_iter()
            .map(TypedUuid::into_uuid)
            .collect();

        units.sort_unstable();
        units.dedup();

        query(ADD_ROTATING_POSITION_UNITS_SQL)
            .bind(position.uuid.into_uuid())
            .bind(units)
            .execute(&mut **tx)
            .await?;

        self.get_rotating_position(tx, position.uuid).await
    }

    pub(crate) async fn get_rotating_position(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        position: RotatingPositionUuid,
    ) -> Result<RotatingPositionRecord, sqlx::Error> {
        query_as::<Postgres, RotatingPositionRecord>(GET_ROTATING_POSITION_SQL)
            .bind(position.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Load the rule and hold its row lock until the transaction ends.
    pub(crate) async fn lock_rotating_position(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        position: RotatingPositionUuid,
    ) -> Result<RotatingPositionRecord, sqlx::Error> {
        query_as::<Postgres, RotatingPositionRecord>(LOCK_ROTATING_POSITION_SQL)
            .bind(position.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_rotating_positions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        active_only: bool,
    ) -> Result<Vec<RotatingPositionRecord>, sqlx::Error> {
        query_as::<Postgres, RotatingPositionRecord>(LIST_ROTATING_POSITIONS_SQL)
            .bind(active_only)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        position: RotatingPositionUuid,
        active: bool,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_ROTATING_POSITION_ACTIVE_SQL)
            .bind(position.into_uuid())
            .bind(active)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn set_cursor(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        position: RotatingPositionUuid,
        cursor: ProfileUuid,
    ) -> Result<(), sqlx::Error> {
        query(SET_ROTATION_CURSOR_SQL)
            .bind(position.into_uuid())
            .bind(cursor.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Live profiles of the position's live units, unordered.
    pub(crate) async fn list_rotation_pool(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        position: RotatingPositionUuid,
    ) -> Result<Vec<RotationEntry>, sqlx::Error> {
        query_as::<Postgres, RotationEntry>(LIST_ROTATION_POOL_SQL)
            .bind(position.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for RotatingPositionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let unit_uuids: Vec<Uuid> = row.try_get("unit_uuids")?;

        Ok(Self {
            uuid: RotatingPositionUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            rule: try_get_rule(row)?,
            active: row.try_get("active")?,
            unit_uuids: unit_uuids.into_iter().map(UnitUuid::from_uuid).collect(),
            cursor_profile_uuid: row
                .try_get::<Option<Uuid>, _>("cursor_profile_uuid")?
                .map(ProfileUuid::from_uuid),
            created_by: row
                .try_get::<Option<Uuid>, _>("created_by")?
                .map(UserUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for RotationEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            profile_uuid: ProfileUuid::from_uuid(row.try_get("profile_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            unit_number: row.try_get("unit_number")?,
            profile_created_at: row
                .try_get::<SqlxTimestamp, _>("profile_created_at")?
                .to_jiff(),
        })
    }
}
