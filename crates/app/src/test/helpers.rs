//! Test Helpers

use jiff::civil::date;

use crate::{
    domain::{
        projects::{
            ProjectsService, ProjectsServiceError,
            data::NewProject,
            records::{ProjectRecord, ProjectUuid},
        },
        units::{
            UnitsService, UnitsServiceError,
            data::{NewProfile, NewUnit, NewUnitType},
            records::{
                ProfileRecord, ProfileUuid, UnitRecord, UnitTypeRecord, UnitTypeUuid, UnitUuid,
            },
        },
        users::UserUuid,
    },
    test::TestContext,
};

pub(crate) async fn create_unit_type(
    ctx: &TestContext,
    name: &str,
) -> Result<UnitTypeRecord, UnitsServiceError> {
    ctx.units
        .create_unit_type(
            ctx.association,
            NewUnitType {
                uuid: UnitTypeUuid::new(),
                name: name.to_string(),
                description: String::new(),
            },
        )
        .await
}

pub(crate) async fn create_unit(
    ctx: &TestContext,
    number: &str,
    unit_type: UnitTypeUuid,
) -> Result<UnitRecord, UnitsServiceError> {
    ctx.units
        .create_unit(
            ctx.association,
            NewUnit {
                uuid: UnitUuid::new(),
                number: number.to_string(),
                unit_type,
            },
        )
        .await
}

/// Create a unit together with a unit type named after it.
pub(crate) async fn create_unit_with_type(
    ctx: &TestContext,
    number: &str,
) -> Result<UnitRecord, UnitsServiceError> {
    let unit_type = create_unit_type(ctx, &format!("Type {number}")).await?;

    create_unit(ctx, number, unit_type.uuid).await
}

/// Register a new resident of `unit`.
pub(crate) async fn create_profile(
    ctx: &TestContext,
    unit: UnitUuid,
) -> Result<ProfileRecord, UnitsServiceError> {
    ctx.units
        .create_profile(
            ctx.association,
            NewProfile {
                uuid: ProfileUuid::new(),
                user: UserUuid::new(),
                unit,
                phone: "+34 600 000 000".to_string(),
                is_owner: false,
            },
        )
        .await
}

pub(crate) async fn create_project(
    ctx: &TestContext,
    name: &str,
) -> Result<ProjectRecord, ProjectsServiceError> {
    ctx.projects
        .create_project(
            ctx.association,
            NewProject {
                uuid: ProjectUuid::new(),
                name: name.to_string(),
                description: String::new(),
                owner: UserUuid::new(),
                budget: 150_000,
                due_date: date(2025, 12, 31),
            },
        )
        .await
}
