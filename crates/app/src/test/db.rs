//! Per-test databases inside a shared PostgreSQL container.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

use crate::database;

pub(super) const SUPERUSER: &str = "condo_test";
pub(super) const SUPERUSER_PASSWORD: &str = "condo_test_password";

static CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Names of databases waiting to be dropped.
static DROP_QUEUE: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

/// Only generated names are ever interpolated into DDL; anything else is refused.
fn is_safe_database_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name.starts_with("condo_test_")
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

async fn start_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(SUPERUSER)
        .with_password(SUPERUSER_PASSWORD)
        .with_db_name("condo_test")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

async fn start_drop_queue() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                eprintln!("Failed to drop test database '{name}': {error}");
            }
        }
    });

    sender
}

/// Superuser URL for `database` on the shared container.
async fn server_url(database: &str) -> Option<String> {
    let container = CONTAINER.get()?;
    let port = container.get_host_port_ipv4(5432).await.ok()?;
    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    Some(format!(
        "postgresql://{SUPERUSER}:{SUPERUSER_PASSWORD}@{host}:{port}/{database}"
    ))
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    if !is_safe_database_name(name) {
        return Ok(());
    }

    let Some(url) = server_url("postgres").await else {
        return Ok(());
    };

    let mut conn = PgConnection::connect(&url).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

/// A freshly migrated database, dropped in the background when the value goes away.
///
/// Services commit their own transactions, so isolation comes from each test owning
/// its database rather than from rollback.
#[derive(Debug)]
pub struct TestDb {
    pool: PgPool,
    name: String,

    /// Superuser URL of this database, used to derive the app-role URL.
    pub(super) url: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(queue) = DROP_QUEUE.get() {
            let _ = queue.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub async fn new() -> Self {
        DROP_QUEUE.get_or_init(start_drop_queue).await;
        CONTAINER.get_or_init(start_container).await;

        let name = format!("condo_test_{}", uuid::Uuid::now_v7().simple());

        let admin_url = server_url("postgres")
            .await
            .expect("Failed to resolve container address");

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let url = server_url(&name)
            .await
            .expect("Failed to resolve container address");

        let pool = PgPool::connect(&url)
            .await
            .expect("Failed to create pool for test database");

        database::migrate(&pool)
            .await
            .expect("Failed to run migrations on test database");

        Self { pool, name, url }
    }

    /// Name of the database owned by this instance.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Superuser pool; bypasses row-level security.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn generated_names_are_accepted() {
        let name = format!("condo_test_{}", uuid::Uuid::now_v7().simple());

        assert!(is_safe_database_name(&name));
    }

    #[test]
    fn foreign_or_quoted_names_are_refused() {
        assert!(!is_safe_database_name(""));
        assert!(!is_safe_database_name("postgres"));
        assert!(!is_safe_database_name("condo_test_x\"; DROP ROLE condo_test"));
        assert!(!is_safe_database_name(&format!("condo_test_{}", "a".repeat(60))));
    }

    #[tokio::test]
    async fn migrations_create_association_table() -> TestResult {
        let db = TestDb::new().await;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM associations")
            .fetch_one(db.pool())
            .await?;

        assert_eq!(count, 0);

        Ok(())
    }
}
