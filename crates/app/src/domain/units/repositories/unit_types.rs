//! Unit Types Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::units::{
    data::NewUnitType,
    records::{UnitTypeRecord, UnitTypeUuid},
};

const CREATE_UNIT_TYPE_SQL: &str = include_str!("../sql/create_unit_type.sql");
const LIST_UNIT_TYPES_SQL: &str = include_str!("../sql/list_unit_types.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUnitTypesRepository;

impl PgUnitTypesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_unit_type(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit_type: NewUnitType,
    ) -> Result<UnitTypeRecord, sqlx::Error> {
        query_as::<Postgres, UnitTypeRecord>(CREATE_UNIT_TYPE_SQL)
            .bind(unit_type.uuid.into_uuid())
            .bind(unit_type.name)
            .bind(unit_type.description)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_unit_types(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<UnitTypeRecord>, sqlx::Error> {
        query_as::<Postgres, UnitTypeRecord>(LIST_UNIT_TYPES_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for UnitTypeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UnitTypeUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
