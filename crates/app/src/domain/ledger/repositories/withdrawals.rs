//! Withdrawals Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::{to_bigint, try_get_unsigned},
    domain::{
        ledger::{
            data::NewWithdrawal,
            records::{WithdrawalRecord, WithdrawalUuid},
        },
        projects::records::ProjectUuid,
    },
    uuids::TypedUuid,
};

const CREATE_WITHDRAWAL_SQL: &str = include_str!("../sql/create_withdrawal.sql");
const LIST_WITHDRAWALS_SQL: &str = include_str!("../sql/list_withdrawals.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWithdrawalsRepository;

impl PgWithdrawalsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_withdrawal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        withdrawal: NewWithdrawal,
    ) -> Result<WithdrawalRecord, sqlx::Error> {
        query_as::<Postgres, WithdrawalRecord>(CREATE_WITHDRAWAL_SQL)
            .bind(withdrawal.uuid.into_uuid())
            .bind(to_bigint(withdrawal.amount, "amount")?)
            .bind(SqlxDate::from(withdrawal.withdrawn_on))
            .bind(withdrawal.description)
            .bind(withdrawal.project.map(TypedUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_withdrawals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<WithdrawalRecord>, sqlx::Error> {
        query_as::<Postgres, WithdrawalRecord>(LIST_WITHDRAWALS_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for WithdrawalRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: WithdrawalUuid::from_uuid(row.try_get("uuid")?),
            amount: try_get_unsigned(row, "amount")?,
            withdrawn_on: row.try_get::<SqlxDate, _>("withdrawn_on")?.to_jiff(),
            description: row.try_get("description")?,
            project_uuid: row
                .try_get::<Option<Uuid>, _>("project_uuid")?
                .map(ProjectUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
