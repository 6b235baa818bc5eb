//! Units service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        associations::records::AssociationUuid,
        units::{
            data::{NewProfile, NewUnit, NewUnitType, UnitFilter, UnitUpdate},
            errors::UnitsServiceError,
            records::{ProfileRecord, ProfileUuid, UnitRecord, UnitTypeRecord, UnitUuid},
            repositories::{PgProfilesRepository, PgUnitTypesRepository, PgUnitsRepository},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgUnitsService {
    db: Db,
    unit_types: PgUnitTypesRepository,
    units: PgUnitsRepository,
    profiles: PgProfilesRepository,
}

impl PgUnitsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            unit_types: PgUnitTypesRepository::new(),
            units: PgUnitsRepository::new(),
            profiles: PgProfilesRepository::new(),
        }
    }
}

#[async_trait]
impl UnitsService for PgUnitsService {
    #[tracing::instrument(
        name = "units.service.create_unit_type",
        skip(self, unit_type),
        fields(association_uuid = %association, unit_type_uuid = %unit_type.uuid),
        err
    )]
    async fn create_unit_type(
        &self,
        association: AssociationUuid,
        unit_type: NewUnitType,
    ) -> Result<UnitTypeRecord, UnitsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self.unit_types.create_unit_type(&mut tx, unit_type).await?;

        tx.commit().await?;

        info!(unit_type_uuid = %created.uuid, name = %created.name, "created unit type");

        Ok(created)
    }

    async fn list_unit_types(
        &self,
        association: AssociationUuid,
    ) -> Result<Vec<UnitTypeRecord>, UnitsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let unit_types = self.unit_types.list_unit_types(&mut tx).await?;

        tx.commit().await?;

        Ok(unit_types)
    }

    #[tracing::instrument(
        name = "units.service.create_unit",
        skip(self, unit),
        fields(association_uuid = %association, unit_uuid = %unit.uuid),
        err
    )]
    async fn create_unit(
        &self,
        association: AssociationUuid,
        unit: NewUnit,
    ) -> Result<UnitRecord, UnitsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self.units.create_unit(&mut tx, unit).await?;

        tx.commit().await?;

        info!(unit_uuid = %created.uuid, number = %created.number, "created unit");

        Ok(created)
    }

    async fn get_unit(
        &self,
        association: AssociationUuid,
        unit: UnitUuid,
    ) -> Result<UnitRecord, UnitsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let unit = self.units.get_unit(&mut tx, unit).await?;

        tx.commit().await?;

        Ok(unit)
    }

    async fn list_units(
        &self,
        association: AssociationUuid,
        filter: UnitFilter,
    ) -> Result<Vec<UnitRecord>, UnitsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let units = self.units.list_units(&mut tx, filter).await?;

        tx.commit().await?;

        Ok(units)
    }

    #[tracing::instrument(
        name = "units.service.update_unit",
        skip(self, update),
        fields(association_uuid = %association, unit_uuid = %unit),
        err
    )]
    async fn update_unit(
        &self,
        association: AssociationUuid,
        unit: UnitUuid,
        update: UnitUpdate,
    ) -> Result<UnitRecord, UnitsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let updated = self.units.update_unit(&mut tx, unit, update).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_unit(
        &self,
        association: AssociationUuid,
        unit: UnitUuid,
    ) -> Result<(), UnitsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let rows_affected = self.units.delete_unit(&mut tx, unit).await?;

        if rows_affected == 0 {
            return Err(UnitsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(unit_uuid = %unit, "deleted unit");

        Ok(())
    }

    #[tracing::instrument(
        name = "units.service.create_profile",
        skip(self, profile),
        fields(
            association_uuid = %association,
            profile_uuid = %profile.uuid,
            unit_uuid = %profile.unit
        ),
        err
    )]
    async fn create_profile(
        &self,
        association: AssociationUuid,
        profile: NewProfile,
    ) -> Result<ProfileRecord, UnitsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self.profiles.create_profile(&mut tx, profile).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_profiles(
        &self,
        association: AssociationUuid,
        unit: Option<UnitUuid>,
    ) -> Result<Vec<ProfileRecord>, UnitsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let profiles = self.profiles.list_profiles(&mut tx, unit).await?;

        tx.commit().await?;

        Ok(profiles)
    }

    async fn delete_profile(
        &self,
        association: AssociationUuid,
        profile: ProfileUuid,
    ) -> Result<(), UnitsServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let rows_affected = self.profiles.delete_profile(&mut tx, profile).await?;

        if rows_affected == 0 {
            return Err(UnitsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait UnitsService: Send + Sync {
    /// Creates a unit type.
    async fn create_unit_type(
        &self,
        association: AssociationUuid,
        unit_type: NewUnitType,
    ) -> Result<UnitTypeRecord, UnitsServiceError>;

    /// Lists unit types by name.
    async fn list_unit_types(
        &self,
        association: AssociationUuid,
    ) -> Result<Vec<UnitTypeRecord>, UnitsServiceError>;

    /// Creates a unit of an existing unit type.
    async fn create_unit(
        &self,
        association: AssociationUuid,
        unit: NewUnit,
    ) -> Result<UnitRecord, UnitsServiceError>;

    /// Retrieve a single unit.
    async fn get_unit(
        &self,
        association: AssociationUuid,
        unit: UnitUuid,
    ) -> Result<UnitRecord, UnitsServiceError>;

    /// Lists units ordered by number.
    async fn list_units(
        &self,
        association: AssociationUuid,
        filter: UnitFilter,
    ) -> Result<Vec<UnitRecord>, UnitsServiceError>;

    /// Renumbers or retypes a unit.
    async fn update_unit(
        &self,
        association: AssociationUuid,
        unit: UnitUuid,
        update: UnitUpdate,
    ) -> Result<UnitRecord, UnitsServiceError>;

    /// Soft-deletes a unit.
    async fn delete_unit(
        &self,
        association: AssociationUuid,
        unit: UnitUuid,
    ) -> Result<(), UnitsServiceError>;

    /// Attaches a resident profile to a unit.
    async fn create_profile(
        &self,
        association: AssociationUuid,
        profile: NewProfile,
    ) -> Result<ProfileRecord, UnitsServiceError>;

    /// Lists profiles ordered by unit number, then by when they were added.
    async fn list_profiles(
        &self,
        association: AssociationUuid,
        unit: Option<UnitUuid>,
    ) -> Result<Vec<ProfileRecord>, UnitsServiceError>;

    /// Soft-deletes a profile.
    async fn delete_profile(
        &self,
        association: AssociationUuid,
        profile: ProfileUuid,
    ) -> Result<(), UnitsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            units::records::{ProfileUuid, UnitTypeUuid},
            users::UserUuid,
        },
        test::{TestContext, helpers},
    };

    use super::*;

    #[tokio::test]
    async fn create_unit_returns_number_and_type() -> TestResult {
        let ctx = TestContext::new().await;
        let unit_type = helpers::create_unit_type(&ctx, "Two bedroom").await?;

        let unit = ctx
            .units
            .create_unit(
                ctx.association,
                NewUnit {
                    uuid: UnitUuid::new(),
                    number: "4B".to_string(),
                    unit_type: unit_type.uuid,
                },
            )
            .await?;

        assert_eq!(unit.number, "4B");
        assert_eq!(unit.unit_type_uuid, unit_type.uuid);
        assert!(unit.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn create_unit_with_unknown_type_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .units
            .create_unit(
                ctx.association,
                NewUnit {
                    uuid: UnitUuid::new(),
                    number: "1A".to_string(),
                    unit_type: UnitTypeUuid::new(),
                },
            )
            .await;

        assert!(
            matches!(result, Err(UnitsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn duplicate_unit_number_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let unit_type = helpers::create_unit_type(&ctx, "Studio").await?;

        helpers::create_unit(&ctx, "101", unit_type.uuid).await?;

        let result = helpers::create_unit(&ctx, "101", unit_type.uuid).await;

        assert!(
            matches!(result, Err(UnitsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unit_number_is_reusable_after_delete() -> TestResult {
        let ctx = TestContext::new().await;
        let unit_type = helpers::create_unit_type(&ctx, "Studio").await?;

        let unit = helpers::create_unit(&ctx, "101", unit_type.uuid).await?;

        ctx.units.delete_unit(ctx.association, unit.uuid).await?;

        helpers::create_unit(&ctx, "101", unit_type.uuid).await?;

        Ok(())
    }

    #[tokio::test]
    async fn list_units_filters_by_type_and_orders_by_number() -> TestResult {
        let ctx = TestContext::new().await;
        let studio = helpers::create_unit_type(&ctx, "Studio").await?;
        let duplex = helpers::create_unit_type(&ctx, "Duplex").await?;

        helpers::create_unit(&ctx, "202", studio.uuid).await?;
        helpers::create_unit(&ctx, "101", studio.uuid).await?;
        helpers::create_unit(&ctx, "301", duplex.uuid).await?;

        let studios = ctx
            .units
            .list_units(
                ctx.association,
                UnitFilter {
                    unit_type: Some(studio.uuid),
                },
            )
            .await?;

        let numbers: Vec<&str> = studios.iter().map(|u| u.number.as_str()).collect();

        assert_eq!(numbers, vec!["101", "202"]);

        let all = ctx
            .units
            .list_units(ctx.association, UnitFilter::default())
            .await?;

        assert_eq!(all.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn update_unit_changes_number() -> TestResult {
        let ctx = TestContext::new().await;
        let unit_type = helpers::create_unit_type(&ctx, "Studio").await?;
        let unit = helpers::create_unit(&ctx, "101", unit_type.uuid).await?;

        let updated = ctx
            .units
            .update_unit(
                ctx.association,
                unit.uuid,
                UnitUpdate {
                    number: "101A".to_string(),
                    unit_type: unit_type.uuid,
                },
            )
            .await?;

        assert_eq!(updated.number, "101A");
        assert_eq!(updated.uuid, unit.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn delete_unit_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let unit_type = helpers::create_unit_type(&ctx, "Studio").await?;
        let unit = helpers::create_unit(&ctx, "101", unit_type.uuid).await?;

        ctx.units.delete_unit(ctx.association, unit.uuid).await?;

        let result = ctx.units.get_unit(ctx.association, unit.uuid).await;

        assert!(
            matches!(result, Err(UnitsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        let again = ctx.units.delete_unit(ctx.association, unit.uuid).await;

        assert!(
            matches!(again, Err(UnitsServiceError::NotFound)),
            "expected NotFound on second delete, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_profiles_orders_by_unit_number_then_creation() -> TestResult {
        let ctx = TestContext::new().await;
        let unit_type = helpers::create_unit_type(&ctx, "Studio").await?;
        let upper = helpers::create_unit(&ctx, "201", unit_type.uuid).await?;
        let lower = helpers::create_unit(&ctx, "101", unit_type.uuid).await?;

        let a = helpers::create_profile(&ctx, upper.uuid).await?;
        let b = helpers::create_profile(&ctx, lower.uuid).await?;
        let c = helpers::create_profile(&ctx, lower.uuid).await?;

        let profiles = ctx.units.list_profiles(ctx.association, None).await?;
        let uuids: Vec<ProfileUuid> = profiles.iter().map(|p| p.uuid).collect();

        assert_eq!(uuids, vec![b.uuid, c.uuid, a.uuid]);

        let lower_only = ctx
            .units
            .list_profiles(ctx.association, Some(lower.uuid))
            .await?;

        assert_eq!(lower_only.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn same_user_cannot_join_unit_twice() -> TestResult {
        let ctx = TestContext::new().await;
        let unit_type = helpers::create_unit_type(&ctx, "Studio").await?;
        let unit = helpers::create_unit(&ctx, "101", unit_type.uuid).await?;
        let user = UserUuid::new();

        let profile = |uuid| NewProfile {
            uuid,
            user,
            unit: unit.uuid,
            phone: "555-0100".to_string(),
            is_owner: true,
        };

        ctx.units
            .create_profile(ctx.association, profile(ProfileUuid::new()))
            .await?;

        let result = ctx
            .units
            .create_profile(ctx.association, profile(ProfileUuid::new()))
            .await;

        assert!(
            matches!(result, Err(UnitsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn deleted_profile_not_listed() -> TestResult {
        let ctx = TestContext::new().await;
        let unit_type = helpers::create_unit_type(&ctx, "Studio").await?;
        let unit = helpers::create_unit(&ctx, "101", unit_type.uuid).await?;
        let profile = helpers::create_profile(&ctx, unit.uuid).await?;

        ctx.units
            .delete_profile(ctx.association, profile.uuid)
            .await?;

        let profiles = ctx.units.list_profiles(ctx.association, None).await?;

        assert!(profiles.is_empty(), "deleted profile should not be listed");

        Ok(())
    }

    #[tokio::test]
    async fn unit_not_visible_to_other_association() -> TestResult {
        let ctx = TestContext::new().await;
        let unit_type = helpers::create_unit_type(&ctx, "Studio").await?;
        let unit = helpers::create_unit(&ctx, "101", unit_type.uuid).await?;

        let other = ctx.create_association("Torre B").await;

        let result = ctx.units.get_unit(other, unit.uuid).await;

        assert!(
            matches!(result, Err(UnitsServiceError::NotFound)),
            "expected NotFound for cross-association access, got {result:?}"
        );

        Ok(())
    }
}
