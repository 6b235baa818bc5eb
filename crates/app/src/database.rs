//! Database connection management

use sqlx::{PgPool, Postgres, Row, Transaction, migrate::MigrateError, postgres::PgRow, query};

use crate::domain::associations::records::AssociationUuid;

/// SQL used to set association context for row-level security.
pub const SET_ASSOCIATION_CONTEXT_SQL: &str =
    "SELECT set_config('app.current_association_uuid', $1, true)";

const ROLE_BYPASSES_RLS_SQL: &str =
    "SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = current_user";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction and set association context for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting association context fails.
    pub async fn begin_association_transaction(
        &self,
        association: AssociationUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_ASSOCIATION_CONTEXT_SQL)
            .bind(association.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error when a migration fails or the applied history diverges.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Whether the connected role skips row-level security (superuser or `BYPASSRLS`).
///
/// # Errors
///
/// Returns an error when the role attributes cannot be read.
pub async fn role_bypasses_rls(pool: &PgPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(ROLE_BYPASSES_RLS_SQL)
        .fetch_one(pool)
        .await
}

/// Convert an amount or count to its `BIGINT` column representation.
pub(crate) fn to_bigint(value: u64, column: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(value)
        .map_err(|e| sqlx::Error::Encode(format!("{column} {value} exceeds BIGINT: {e}").into()))
}

/// Read a non-negative `BIGINT` column.
pub(crate) fn try_get_unsigned(row: &PgRow, column: &str) -> Result<u64, sqlx::Error> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
