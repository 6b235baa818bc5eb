//! Profiles Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    domain::{
        units::{
            data::NewProfile,
            records::{ProfileRecord, ProfileUuid, UnitUuid},
        },
        users::UserUuid,
    },
    uuids::TypedUuid,
};

const CREATE_PROFILE_SQL: &str = include_str!("../sql/create_profile.sql");
const LIST_PROFILES_SQL: &str = include_str!("../sql/list_profiles.sql");
const DELETE_PROFILE_SQL: &str = include_str!("../sql/delete_profile.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProfilesRepository;

impl PgProfilesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile: NewProfile,
    ) -> Result<ProfileRecord, sqlx::Error> {
        query_as::<Postgres, ProfileRecord>(CREATE_PROFILE_SQL)
            .bind(profile.uuid.into_uuid())
            .bind(profile.user.into_uuid())
            .bind(profile.unit.into_uuid())
            .bind(profile.phone)
            .bind(profile.is_owner)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_profiles(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit: Option<UnitUuid>,
    ) -> Result<Vec<ProfileRecord>, sqlx::Error> {
        query_as::<Postgres, ProfileRecord>(LIST_PROFILES_SQL)
            .bind(unit.map(TypedUuid::into_uuid))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile: ProfileUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PROFILE_SQL)
            .bind(profile.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ProfileRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProfileUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            unit_uuid: UnitUuid::from_uuid(row.try_get("unit_uuid")?),
            phone: row.try_get("phone")?,
            is_owner: row.try_get("is_owner")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
