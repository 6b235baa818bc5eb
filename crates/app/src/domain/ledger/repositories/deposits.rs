//! Deposits Repository

use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{to_bigint, try_get_unsigned},
    domain::{
        ledger::{
            data::{DepositFilter, NewDeposit},
            records::{Balance, DepositRecord, DepositUuid, FeeUuid},
        },
        units::records::UnitUuid,
    },
    uuids::TypedUuid,
};

const CREATE_DEPOSIT_SQL: &str = include_str!("../sql/create_deposit.sql");
const LIST_DEPOSITS_SQL: &str = include_str!("../sql/list_deposits.sql");
const BALANCE_SQL: &str = include_str!("../sql/balance.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDepositsRepository;

impl PgDepositsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_deposit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deposit: NewDeposit,
    ) -> Result<DepositRecord, sqlx::Error> {
        query_as::<Postgres, DepositRecord>(CREATE_DEPOSIT_SQL)
            .bind(deposit.uuid.into_uuid())
            .bind(deposit.unit.map(TypedUuid::into_uuid))
            .bind(deposit.fee.map(TypedUuid::into_uuid))
            .bind(to_bigint(deposit.amount, "amount")?)
            .bind(SqlxDate::from(deposit.deposited_on))
            .bind(deposit.reference)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_deposits(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: DepositFilter,
    ) -> Result<Vec<DepositRecord>, sqlx::Error> {
        query_as::<Postgres, DepositRecord>(LIST_DEPOSITS_SQL)
            .bind(filter.fee.map(TypedUuid::into_uuid))
            .bind(filter.unit.map(TypedUuid::into_uuid))
            .fetch_all(&mut **tx)
            .await
    }

    /// Deposits and withdrawals dated on or before `as_of`.
    pub(crate) async fn balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        as_of: Date,
    ) -> Result<Balance, sqlx::Error> {
        let row = query(BALANCE_SQL)
            .bind(SqlxDate::from(as_of))
            .fetch_one(&mut **tx)
            .await?;

        Ok(Balance {
            deposited: try_get_unsigned(&row, "deposited")?,
            withdrawn: try_get_unsigned(&row, "withdrawn")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for DepositRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: DepositUuid::from_uuid(row.try_get("uuid")?),
            unit_uuid: row
                .try_get::<Option<Uuid>, _>("unit_uuid")?
                .map(UnitUuid::from_uuid),
            fee_uuid: row
                .try_get::<Option<Uuid>, _>("fee_uuid")?
                .map(FeeUuid::from_uuid),
            amount: try_get_unsigned(row, "amount")?,
            deposited_on: row.try_get::<SqlxDate, _>("deposited_on")?.to_jiff(),
            reference: row.try_get("reference")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
