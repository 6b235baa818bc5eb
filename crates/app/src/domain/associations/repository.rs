//! Associations Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::domain::associations::{
    data::NewAssociation,
    records::{AssociationRecord, AssociationUuid},
};

const CREATE_ASSOCIATION_SQL: &str = include_str!("sql/create_association.sql");
const LIST_ASSOCIATIONS_SQL: &str = include_str!("sql/list_associations.sql");

/// PostgreSQL-backed associations repository.
///
/// The associations table sits outside row-level security, so this repository works on
/// the pool directly rather than an association-scoped transaction.
#[derive(Debug, Clone)]
pub(crate) struct PgAssociationsRepository {
    pool: PgPool,
}

impl PgAssociationsRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_association(
        &self,
        association: NewAssociation,
    ) -> Result<AssociationRecord, sqlx::Error> {
        query_as::<Postgres, AssociationRecord>(CREATE_ASSOCIATION_SQL)
            .bind(association.uuid.into_uuid())
            .bind(association.name)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn list_associations(&self) -> Result<Vec<AssociationRecord>, sqlx::Error> {
        query_as::<Postgres, AssociationRecord>(LIST_ASSOCIATIONS_SQL)
            .fetch_all(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AssociationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AssociationUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
