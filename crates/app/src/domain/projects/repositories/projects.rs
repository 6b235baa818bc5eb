//! Projects Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{to_bigint, try_get_unsigned},
    domain::{
        projects::{
            data::NewProject,
            records::{ProjectRecord, ProjectUuid},
        },
        users::UserUuid,
    },
};

const CREATE_PROJECT_SQL: &str = include_str!("../sql/create_project.sql");
const GET_PROJECT_SQL: &str = include_str!("../sql/get_project.sql");
const LIST_PROJECTS_SQL: &str = include_str!("../sql/list_projects.sql");
const MARK_DELIVERED_SQL: &str = include_str!("../sql/mark_delivered.sql");
const DELETE_PROJECT_SQL: &str = include_str!("../sql/delete_project.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProjectsRepository;

impl PgProjectsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_project(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: NewProject,
    ) -> Result<ProjectRecord, sqlx::Error> {
        query_as::<Postgres, ProjectRecord>(CREATE_PROJECT_SQL)
            .bind(project.uuid.into_uuid())
            .bind(project.name)
            .bind(project.description)
            .bind(project.owner.into_uuid())
            .bind(to_bigint(project.budget, "budget")?)
            .bind(SqlxDate::from(project.due_date))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_project(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: ProjectUuid,
    ) -> Result<ProjectRecord, sqlx::Error> {
        query_as::<Postgres, ProjectRecord>(GET_PROJECT_SQL)
            .bind(project.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_projects(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ProjectRecord>, sqlx::Error> {
        query_as::<Postgres, ProjectRecord>(LIST_PROJECTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn mark_delivered(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: ProjectUuid,
    ) -> Result<ProjectRecord, sqlx::Error> {
        query_as::<Postgres, ProjectRecord>(MARK_DELIVERED_SQL)
            .bind(project.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_project(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: ProjectUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PROJECT_SQL)
            .bind(project.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ProjectRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProjectUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            owner_uuid: UserUuid::from_uuid(row.try_get("owner_uuid")?),
            budget: try_get_unsigned(row, "budget")?,
            due_date: row.try_get::<SqlxDate, _>("due_date")?.to_jiff(),
            delivered: row.try_get("delivered")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
