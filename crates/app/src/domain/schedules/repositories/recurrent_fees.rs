//! Recurrent Fees Repository

use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{to_bigint, try_get_unsigned},
    domain::{
        ledger::records::{FeeRecord, FeeUuid},
        schedules::{
            data::NewRecurrentFee,
            records::{RecurrentFeeRecord, RecurrentFeeUuid},
        },
        units::records::{UnitTypeUuid, UnitUuid},
        users::UserUuid,
    },
    uuids::TypedUuid,
};

use super::try_get_rule;

const CREATE_RECURRENT_FEE_SQL: &str = include_str!("../sql/create_recurrent_fee.sql");
const LIST_RECURRENT_FEES_SQL: &str = include_str!("../sql/list_recurrent_fees.sql");
const SET_RECURRENT_FEE_ACTIVE_SQL: &str = include_str!("../sql/set_recurrent_fee_active.sql");
const LOCK_RECURRENT_FEE_SQL: &str = include_str!("../sql/lock_recurrent_fee.sql");
const LIST_BILLABLE_UNITS_SQL: &str = include_str!("../sql/list_billable_units.sql");
const CREATE_GENERATED_FEE_SQL: &str = include_str!("../sql/create_generated_fee.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRecurrentFeesRepository;

impl PgRecurrentFeesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_recurrent_fee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fee: NewRecurrentFee,
    ) -> Result<RecurrentFeeRecord, sqlx::Error> {
        query_as::<Postgres, RecurrentFeeRecord>(CREATE_RECURRENT_FEE_SQL)
            .bind(fee.uuid.into_uuid())
            .bind(fee.name)
            .bind(to_bigint(fee.amount, "amount")?)
            .bind(fee.unit_type.into_uuid())
            .bind(fee.rule.weekdays().to_values())
            .bind(fee.rule.monthdays().to_values())
            .bind(fee.rule.months().to_values())
            .bind(fee.created_by.map(TypedUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_recurrent_fees(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        active_only: bool,
    ) -> Result<Vec<RecurrentFeeRecord>, sqlx::Error> {
        query_as::<Postgres, RecurrentFeeRecord>(LIST_RECURRENT_FEES_SQL)
            .bind(active_only)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fee: RecurrentFeeUuid,
        active: bool,
    ) -> Result<RecurrentFeeRecord, sqlx::Error> {
        query_as::<Postgres, RecurrentFeeRecord>(SET_RECURRENT_FEE_ACTIVE_SQL)
            .bind(fee.into_uuid())
            .bind(active)
            .fetch_one(&mut **tx)
            .await
    }

    /// Load the rule and hold its row lock until the transaction ends.
    pub(crate) async fn lock_recurrent_fee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fee: RecurrentFeeUuid,
    ) -> Result<RecurrentFeeRecord, sqlx::Error> {
        query_as::<Postgres, RecurrentFeeRecord>(LOCK_RECURRENT_FEE_SQL)
            .bind(fee.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_billable_units(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit_type: UnitTypeUuid,
    ) -> Result<Vec<UnitUuid>, sqlx::Error> {
        let units: Vec<Uuid> = query_scalar(LIST_BILLABLE_UNITS_SQL)
            .bind(unit_type.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(units.into_iter().map(UnitUuid::from_uuid).collect())
    }

    /// Insert the fee generated for `unit` on `due_date`. Returns `None` when the rule already
    /// billed that unit for that date.
    pub(crate) async fn create_generated_fee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rule: &RecurrentFeeRecord,
        unit: UnitUuid,
        due_date: Date,
    ) -> Result<Option<FeeRecord>, sqlx::Error> {
        query_as::<Postgres, FeeRecord>(CREATE_GENERATED_FEE_SQL)
            .bind(FeeUuid::new().into_uuid())
            .bind(&rule.name)
            .bind(to_bigint(rule.amount, "amount")?)
            .bind(unit.into_uuid())
            .bind(SqlxDate::from(due_date))
            .bind(rule.uuid.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for RecurrentFeeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: RecurrentFeeUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            amount: try_get_unsigned(row, "amount")?,
            unit_type_uuid: UnitTypeUuid::from_uuid(row.try_get("unit_type_uuid")?),
            rule: try_get_rule(row)?,
            active: row.try_get("active")?,
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
