use clap::Args;
use condo_app::{
    database,
    domain::associations::{
        AssociationsService, PgAssociationsService, data::NewAssociation,
        records::AssociationUuid,
    },
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateAssociationArgs {
    /// Association display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional association UUID; generated when omitted
    #[arg(long)]
    association_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateAssociationArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAssociationsService::new(pool);
    let association_uuid = args
        .association_uuid
        .map_or_else(AssociationUuid::new, AssociationUuid::from_uuid);

    let association = service
        .create_association(NewAssociation {
            uuid: association_uuid,
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create association: {error}"))?;

    println!("association_uuid: {}", association.uuid);
    println!("association_name: {}", association.name);

    Ok(())
}
