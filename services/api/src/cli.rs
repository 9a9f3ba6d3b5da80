use crate::demo::{run_demo, run_lead_import, DemoArgs, LeadImportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use showroom::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Showroom Sales Desk",
    about = "Run and demonstrate the showroom sales desk from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with storefront lead sheets
    Leads {
        #[command(subcommand)]
        command: LeadsCommand,
    },
    /// Run an end-to-end CLI demo covering the lead and proposal pipeline
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum LeadsCommand {
    /// Import a storefront lead sheet and print the registered pipeline
    Import(LeadImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Leads {
            command: LeadsCommand::Import(args),
        } => run_lead_import(args),
        Command::Demo(args) => run_demo(args),
    }
}
