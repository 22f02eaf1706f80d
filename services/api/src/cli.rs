use crate::commands::{
    run_overview, run_report, run_request_list, OverviewArgs, ReportArgs, RequestListArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use care_dispatch::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Care Dispatch",
    about = "Run the care dispatch service or inspect requests from the command line",
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
    /// Inspect support requests
    Requests {
        #[command(subcommand)]
        command: RequestsCommand,
    },
    /// Print the dashboard overview numbers
    Overview(OverviewArgs),
    /// Print the analytics report for a look-back window
    Report(ReportArgs),
}

#[derive(Subcommand, Debug)]
enum RequestsCommand {
    /// List requests matching the filters, optionally exporting them as CSV
    List(RequestListArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Request export to serve instead of the built-in sample set
    #[arg(long)]
    pub(crate) requests_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Requests {
            command: RequestsCommand::List(args),
        } => run_request_list(args),
        Command::Overview(args) => run_overview(args),
        Command::Report(args) => run_report(args),
    }
}
