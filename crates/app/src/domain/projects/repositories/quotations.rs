//! Quotations Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{to_bigint, try_get_unsigned},
    domain::{
        projects::{
            data::NewQuotation,
            records::{ProjectUuid, QuotationRecord, QuotationUuid},
        },
        users::UserUuid,
    },
};

const CREATE_QUOTATION_SQL: &str = include_str!("../sql/create_quotation.sql");
const LIST_QUOTATIONS_SQL: &str = include_str!("../sql/list_quotations.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgQuotationsRepository;

impl PgQuotationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_quotation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: ProjectUuid,
        quotation: NewQuotation,
    ) -> Result<QuotationRecord, sqlx::Error> {
        query_as::<Postgres, QuotationRecord>(CREATE_QUOTATION_SQL)
            .bind(quotation.uuid.into_uuid())
            .bind(project.into_uuid())
            .bind(quotation.provider)
            .bind(quotation.submitted_by.into_uuid())
            .bind(to_bigint(quotation.price, "price")?)
            .bind(quotation.attachment_path)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_quotations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: ProjectUuid,
    ) -> Result<Vec<QuotationRecord>, sqlx::Error> {
        query_as::<Postgres, QuotationRecord>(LIST_QUOTATIONS_SQL)
            .bind(project.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for QuotationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: QuotationUuid::from_uuid(row.try_get("uuid")?),
            project_uuid: ProjectUuid::from_uuid(row.try_get("project_uuid")?),
            provider: row.try_get("provider")?,
            submitted_by: UserUuid::from_uuid(row.try_get("submitted_by")?),
            price: try_get_unsigned(row, "price")?,
            attachment_path: row.try_get("attachment_path")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
