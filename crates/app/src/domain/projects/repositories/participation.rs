//! Votes and Volunteers Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::try_get_unsigned,
    domain::{
        projects::records::{ProjectUuid, VolunteerRecord, VoteTally},
        users::UserUuid,
    },
};

const UPSERT_VOTE_SQL: &str = include_str!("../sql/upsert_vote.sql");
const TALLY_VOTES_SQL: &str = include_str!("../sql/tally_votes.sql");
const CREATE_VOLUNTEER_SQL: &str = include_str!("../sql/create_volunteer.sql");
const LIST_VOLUNTEERS_SQL: &str = include_str!("../sql/list_volunteers.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgParticipationRepository;

impl PgParticipationRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn upsert_vote(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: ProjectUuid,
        user: UserUuid,
        in_favour: bool,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPSERT_VOTE_SQL)
            .bind(project.into_uuid())
            .bind(user.into_uuid())
            .bind(in_favour)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn tally_votes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: ProjectUuid,
    ) -> Result<VoteTally, sqlx::Error> {
        let row = query(TALLY_VOTES_SQL)
            .bind(project.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(VoteTally {
            in_favour: try_get_unsigned(&row, "in_favour")?,
            against: try_get_unsigned(&row, "against")?,
        })
    }

    /// Returns 0 when the user already volunteered.
    pub(crate) async fn create_volunteer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: ProjectUuid,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CREATE_VOLUNTEER_SQL)
            .bind(project.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_volunteers(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project: ProjectUuid,
    ) -> Result<Vec<VolunteerRecord>, sqlx::Error> {
        query_as::<Postgres, VolunteerRecord>(LIST_VOLUNTEERS_SQL)
            .bind(project.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for VolunteerRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            project_uuid: ProjectUuid::from_uuid(row.try_get("project_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
