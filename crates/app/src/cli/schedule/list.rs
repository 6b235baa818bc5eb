use clap::Args;
use condo_app::domain::associations::records::AssociationUuid;
use jiff::{Zoned, civil::Date};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListSchedulesArgs {
    /// Application-role PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Association whose schedules are listed
    #[arg(long)]
    association: Uuid,

    /// Date from which the next due date is computed; defaults to today
    #[arg(long)]
    from: Option<Date>,
}

pub(crate) async fn run(args: ListSchedulesArgs) -> Result<(), String> {
    let ctx = super::connect(&args.database_url).await?;
    let association = AssociationUuid::from_uuid(args.association);
    let from = args.from.unwrap_or_else(|| Zoned::now().date());

    let fees = ctx
        .schedules
        .list_recurrent_fees(association, false)
        .await
        .map_err(|error| format!("failed to list recurrent fees: {error}"))?;

    let positions = ctx
        .schedules
        .list_rotating_positions(association, false)
        .await
        .map_err(|error| format!("failed to list rotating positions: {error}"))?;

    for fee in fees {
        println!("recurrent_fee_uuid: {}", fee.uuid);
        println!("name: {}", fee.name);
        println!("amount: {}", fee.amount);
        println!("active: {}", fee.active);
        println!("next_due: {}", next_due(fee.active, fee.rule.next_due(from)));
        println!();
    }

    for position in positions {
        println!("rotating_position_uuid: {}", position.uuid);
        println!("name: {}", position.name);
        println!("units: {}", position.unit_uuids.len());
        println!("active: {}", position.active);
        println!("next_due: {}", next_due(position.active, position.rule.next_due(from)));
        println!();
    }

    Ok(())
}

fn next_due(active: bool, date: Option<Date>) -> String {
    match (active, date) {
        (false, _) => "paused".to_string(),
        (true, Some(date)) => date.to_string(),
        (true, None) => "never".to_string(),
    }
}
