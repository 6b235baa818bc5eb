use clap::Args;
use condo_app::{
    database,
    domain::associations::{AssociationsService, PgAssociationsService},
};

#[derive(Debug, Args)]
pub(crate) struct ListAssociationsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ListAssociationsArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let associations = PgAssociationsService::new(pool)
        .list_associations()
        .await
        .map_err(|error| format!("failed to list associations: {error}"))?;

    if associations.is_empty() {
        println!("no associations found");
        return Ok(());
    }

    for association in associations {
        println!("association_uuid: {}", association.uuid);
        println!("association_name: {}", association.name);
        println!("created_at: {}", association.created_at);
        println!();
    }

    Ok(())
}
