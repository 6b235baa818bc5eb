use clap::Args;
use condo_app::database;
use sqlx::{Postgres, Transaction, query, query_scalar};

/// Attributes every runtime role is forced into; `NOBYPASSRLS` keeps
/// association policies in effect for the daily driver and services.
const ROLE_ATTRIBUTES: &str =
    "LOGIN NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS";

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Runtime role used by the CLI and scheduled jobs
    #[arg(long, default_value = "condo_app")]
    role_name: String,

    /// Password assigned to the runtime role
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|error| format!("failed to start transaction: {error}"))?;

    // Identifiers cannot be bound as parameters, so quote them server-side.
    let role = quote(&mut tx, "SELECT quote_ident($1)", &args.role_name).await?;
    let password = quote(&mut tx, "SELECT quote_literal($1)", &args.password).await?;

    let exists: bool = query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
        .bind(&args.role_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to look up role: {error}"))?;

    let verb = if exists { "ALTER" } else { "CREATE" };

    query(&format!(
        "{verb} ROLE {role} {ROLE_ATTRIBUTES} PASSWORD {password}"
    ))
    .execute(&mut *tx)
    .await
    .map_err(|error| format!("failed to {} role: {error}", verb.to_lowercase()))?;

    let database: String = query_scalar("SELECT quote_ident(current_database())")
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to resolve database name: {error}"))?;

    for statement in privileges(&database, &role) {
        query(&statement)
            .execute(&mut *tx)
            .await
            .map_err(|error| format!("failed to apply `{statement}`: {error}"))?;
    }

    tx.commit()
        .await
        .map_err(|error| format!("failed to commit role changes: {error}"))?;

    println!("role: {}", args.role_name);
    println!("privileges: granted on {database} (public schema, current and future objects)");

    Ok(())
}

async fn quote(
    tx: &mut Transaction<'_, Postgres>,
    sql: &'static str,
    value: &str,
) -> Result<String, String> {
    query_scalar(sql)
        .bind(value)
        .fetch_one(&mut **tx)
        .await
        .map_err(|error| format!("failed to quote `{value}`: {error}"))
}

fn privileges(database: &str, role: &str) -> Vec<String> {
    vec![
        format!("GRANT CONNECT ON DATABASE {database} TO {role}"),
        format!("GRANT USAGE ON SCHEMA public TO {role}"),
        format!("GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {role}"),
        format!("GRANT USAGE, SELECT, UPDATE ON ALL SEQUENCES IN SCHEMA public TO {role}"),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO {role}"
        ),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public GRANT USAGE, SELECT, UPDATE ON SEQUENCES TO {role}"
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privileges_cover_tables_and_sequences() {
        let statements = privileges("\"condo\"", "condo_app");

        assert!(statements.iter().any(|s| s.contains("ON ALL TABLES")));
        assert!(statements.iter().any(|s| s.contains("ON ALL SEQUENCES")));
        assert!(statements.iter().all(|s| s.ends_with("condo_app")));
    }
}
