//! Units Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    domain::units::{
        data::{NewUnit, UnitFilter, UnitUpdate},
        records::{UnitRecord, UnitTypeUuid, UnitUuid},
    },
    uuids::TypedUuid,
};

const CREATE_UNIT_SQL: &str = include_str!("../sql/create_unit.sql");
const GET_UNIT_SQL: &str = include_str!("../sql/get_unit.sql");
const LIST_UNITS_SQL: &str = include_str!("../sql/list_units.sql");
const UPDATE_UNIT_SQL: &str = include_str!("../sql/update_unit.sql");
const DELETE_UNIT_SQL: &str = include_str!("../sql/delete_unit.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUnitsRepository;

impl PgUnitsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_unit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit: NewUnit,
    ) -> Result<UnitRecord, sqlx::Error> {
        query_as::<Postgres, UnitRecord>(CREATE_UNIT_SQL)
            .bind(unit.uuid.into_uuid())
            .bind(unit.number)
            .bind(unit.unit_type.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_unit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit: UnitUuid,
    ) -> Result<UnitRecord, sqlx::Error> {
        query_as::<Postgres, UnitRecord>(GET_UNIT_SQL)
            .bind(unit.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_units(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: UnitFilter,
    ) -> Result<Vec<UnitRecord>, sqlx::Error> {
        query_as::<Postgres, UnitRecord>(LIST_UNITS_SQL)
            .bind(filter.unit_type.map(TypedUuid::into_uuid))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_unit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit: UnitUuid,
        update: UnitUpdate,
    ) -> Result<UnitRecord, sqlx::Error> {
        query_as::<Postgres, UnitRecord>(UPDATE_UNIT_SQL)
            .bind(unit.into_uuid())
            .bind(update.number)
            .bind(update.unit_type.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_unit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit: UnitUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_UNIT_SQL)
            .bind(unit.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for UnitRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UnitUuid::from_uuid(row.try_get("uuid")?),
            number: row.try_get("number")?,
            unit_type_uuid: UnitTypeUuid::from_uuid(row.try_get("unit_type_uuid")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
