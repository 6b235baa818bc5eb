//! Units Repositories

mod profiles;
mod unit_types;
mod units;

pub(crate) use profiles::PgProfilesRepository;
pub(crate) use unit_types::PgUnitTypesRepository;
pub(crate) use units::PgUnitsRepository;
