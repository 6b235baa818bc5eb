use clap::{Args, Subcommand};

mod create;
mod list;

#[derive(Debug, Args)]
pub(crate) struct AssociationCommand {
    #[command(subcommand)]
    command: AssociationSubcommand,
}

#[derive(Debug, Subcommand)]
enum AssociationSubcommand {
    Create(create::CreateAssociationArgs),
    List(list::ListAssociationsArgs),
}

pub(crate) async fn run(command: AssociationCommand) -> Result<(), String> {
    match command.command {
        AssociationSubcommand::Create(args) => create::run(args).await,
        AssociationSubcommand::List(args) => list::run(args).await,
    }
}
