use clap::{Args, Subcommand};
use condo_app::context::AppContext;

mod list;
mod run_daily;

#[derive(Debug, Args)]
pub(crate) struct ScheduleCommand {
    #[command(subcommand)]
    command: ScheduleSubcommand,
}

#[derive(Debug, Subcommand)]
enum ScheduleSubcommand {
    /// Fire every schedule due on a date
    RunDaily(run_daily::RunDailyArgs),

    /// Show schedules and when they next fall due
    List(list::ListSchedulesArgs),
}

pub(crate) async fn run(command: ScheduleCommand) -> Result<(), String> {
    match command.command {
        ScheduleSubcommand::RunDaily(args) => run_daily::run(args).await,
        ScheduleSubcommand::List(args) => list::run(args).await,
    }
}

async fn connect(database_url: &str) -> Result<AppContext, String> {
    AppContext::from_database_url(database_url)
        .await
        .map_err(|error| format!("failed to initialize app: {error}"))
}
