//! Test context for service-level integration tests.

use sqlx::{Connection, PgConnection, PgPool, query};

use crate::{
    database::Db,
    domain::{
        announcements::PgAnnouncementsService,
        associations::{
            AssociationsService, PgAssociationsService, data::NewAssociation,
            records::AssociationUuid,
        },
        ledger::PgLedgerService,
        projects::PgProjectsService,
        schedules::PgSchedulesService,
        units::PgUnitsService,
    },
};

use super::db::{SUPERUSER, SUPERUSER_PASSWORD, TestDb};

/// Restricted login used by services so association policies apply.
const APP_ROLE: &str = "condo_app_test";
const APP_ROLE_PASSWORD: &str = "condo_app_test_password";

/// `duplicate_object` and `unique_violation`, raised when parallel tests race to create the role.
const ROLE_RACE_CODES: [&str; 2] = ["42710", "23505"];

pub struct TestContext {
    pub db: TestDb,

    /// Association every service call in a test defaults to.
    pub association: AssociationUuid,

    pub units: PgUnitsService,
    pub projects: PgProjectsService,
    pub ledger: PgLedgerService,
    pub announcements: PgAnnouncementsService,
    pub schedules: PgSchedulesService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(app_pool(&test_db).await);

        let mut ctx = Self {
            units: PgUnitsService::new(db.clone()),
            projects: PgProjectsService::new(db.clone()),
            ledger: PgLedgerService::new(db.clone()),
            announcements: PgAnnouncementsService::new(db.clone()),
            schedules: PgSchedulesService::new(db),
            association: AssociationUuid::new(),
            db: test_db,
        };

        ctx.association = ctx.create_association("Torre A").await;

        ctx
    }

    /// Create another association, for isolation tests.
    pub async fn create_association(&self, name: &str) -> AssociationUuid {
        PgAssociationsService::new(self.db.pool().clone())
            .create_association(NewAssociation {
                uuid: AssociationUuid::new(),
                name: name.to_string(),
            })
            .await
            .expect("Failed to create test association")
            .uuid
    }
}

/// Ensure the restricted role exists with access to `test_db`, and connect as it.
///
/// Superusers skip row-level security even when it is forced, so services under test
/// must not share the superuser pool.
async fn app_pool(test_db: &TestDb) -> PgPool {
    let mut conn = PgConnection::connect(&test_db.url)
        .await
        .expect("Failed to connect to test database for role setup");

    let created = query(&format!(
        "CREATE ROLE {APP_ROLE} WITH LOGIN PASSWORD '{APP_ROLE_PASSWORD}' \
           NOSUPERUSER NOCREATEDB NOCREATEROLE NOBYPASSRLS"
    ))
    .execute(&mut conn)
    .await;

    match created {
        Ok(_) => {}
        Err(sqlx::Error::Database(ref error))
            if error
                .code()
                .is_some_and(|code| ROLE_RACE_CODES.contains(&code.as_ref())) => {}
        Err(error) => panic!("Failed to create app role: {error}"),
    }

    for statement in [
        format!("GRANT CONNECT ON DATABASE \"{}\" TO {APP_ROLE}", test_db.name()),
        format!("GRANT USAGE ON SCHEMA public TO {APP_ROLE}"),
        format!("GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {APP_ROLE}"),
        format!("GRANT USAGE, SELECT ON ALL SEQUENCES IN SCHEMA public TO {APP_ROLE}"),
    ] {
        query(&statement)
            .execute(&mut conn)
            .await
            .expect("Failed to grant privileges to app role");
    }

    conn.close()
        .await
        .expect("Failed to close role setup connection");

    let app_url = test_db.url.replacen(
        &format!("{SUPERUSER}:{SUPERUSER_PASSWORD}"),
        &format!("{APP_ROLE}:{APP_ROLE_PASSWORD}"),
        1,
    );

    PgPool::connect(&app_url)
        .await
        .expect("Failed to connect as app role")
}
