use clap::{Parser, Subcommand};
use condo_app::logging::LoggingConfig;

mod association;
mod db;
mod schedule;

#[derive(Debug, Parser)]
#[command(name = "condo-app", about = "Condominium association CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Association(association::AssociationCommand),
    Db(db::DbCommand),
    Schedule(schedule::ScheduleCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Association(command) => association::run(command).await,
            Commands::Db(command) => db::run(command).await,
            Commands::Schedule(command) => schedule::run(command).await,
        }
    }
}
