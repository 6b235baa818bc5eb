//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        announcements::{AnnouncementsService, PgAnnouncementsService},
        associations::{AssociationsService, PgAssociationsService},
        ledger::{LedgerService, PgLedgerService},
        projects::{PgProjectsService, ProjectsService},
        schedules::{PgSchedulesService, SchedulesService},
        units::{PgUnitsService, UnitsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("database role bypasses row-level security; connect as the app role")]
    RlsBypassed,
}

#[derive(Clone)]
pub struct AppContext {
    pub associations: Arc<dyn AssociationsService>,
    pub units: Arc<dyn UnitsService>,
    pub projects: Arc<dyn ProjectsService>,
    pub ledger: Arc<dyn LedgerService>,
    pub announcements: Arc<dyn AnnouncementsService>,
    pub schedules: Arc<dyn SchedulesService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails or when the connected
    /// role would bypass row-level security.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if database::role_bypasses_rls(&pool)
            .await
            .map_err(AppInitError::Database)?
        {
            return Err(AppInitError::RlsBypassed);
        }

        let db = Db::new(pool.clone());

        Ok(Self {
            associations: Arc::new(PgAssociationsService::new(pool)),
            units: Arc::new(PgUnitsService::new(db.clone())),
            projects: Arc::new(PgProjectsService::new(db.clone())),
            ledger: Arc::new(PgLedgerService::new(db.clone())),
            announcements: Arc::new(PgAnnouncementsService::new(db.clone())),
            schedules: Arc::new(PgSchedulesService::new(db)),
        })
    }
}
