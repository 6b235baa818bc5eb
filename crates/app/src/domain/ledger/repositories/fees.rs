//! Fees Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{to_bigint, try_get_unsigned},
    domain::{
        ledger::{
            data::{FeeFilter, NewFee},
            records::{FeeRecord, FeeUuid},
        },
        schedules::records::RecurrentFeeUuid,
        units::records::UnitUuid,
        users::UserUuid,
    },
    uuids::TypedUuid,
};

const CREATE_FEE_SQL: &str = include_str!("../sql/create_fee.sql");
const GET_FEE_SQL: &str = include_str!("../sql/get_fee.sql");
const LIST_FEES_SQL: &str = include_str!("../sql/list_fees.sql");
const DELETE_FEE_SQL: &str = include_str!("../sql/delete_fee.sql");
const SUM_FEE_DEPOSITS_SQL: &str = include_str!("../sql/sum_fee_deposits.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgFeesRepository;

impl PgFeesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_fee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fee: NewFee,
    ) -> Result<FeeRecord, sqlx::Error> {
        query_as::<Postgres, FeeRecord>(CREATE_FEE_SQL)
            .bind(fee.uuid.into_uuid())
            .bind(fee.name)
            .bind(to_bigint(fee.amount, "amount")?)
            .bind(fee.unit.into_uuid())
            .bind(SqlxDate::from(fee.due_date))
            .bind(fee.created_by.map(TypedUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_fee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fee: FeeUuid,
    ) -> Result<FeeRecord, sqlx::Error> {
        query_as::<Postgres, FeeRecord>(GET_FEE_SQL)
            .bind(fee.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_fees(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: FeeFilter,
    ) -> Result<Vec<FeeRecord>, sqlx::Error> {
        query_as::<Postgres, FeeRecord>(LIST_FEES_SQL)
            .bind(filter.unit.map(TypedUuid::into_uuid))
            .bind(filter.due_on.map(SqlxDate::from))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_fee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fee: FeeUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_FEE_SQL)
            .bind(fee.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn amount_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fee: FeeUuid,
    ) -> Result<u64, sqlx::Error> {
        let row = query(SUM_FEE_DEPOSITS_SQL)
            .bind(fee.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        try_get_unsigned(&row, "amount_paid")
    }
}

impl<'r> FromRow<'r, PgRow> for FeeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: FeeUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            amount: try_get_unsigned(row, "amount")?,
            unit_uuid: UnitUuid::from_uuid(row.try_get("unit_uuid")?),
            due_date: row.try_get::<SqlxDate, _>("due_date")?.to_jiff(),
            recurrent_fee_uuid: row
                .try_get::<Option<Uuid>, _>("recurrent_fee_uuid")?
                .map(RecurrentFeeUuid::from_uuid),
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
