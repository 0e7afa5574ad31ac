use crate::demo::{run_demo, run_portfolio_list, DemoArgs, PortfolioListArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loanlens::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "LoanLens",
    about = "Run and demonstrate the LoanLens lending service from the command line",
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
    /// Work with the borrower portfolio
    Portfolio {
        #[command(subcommand)]
        command: PortfolioCommand,
    },
    /// Run an end-to-end CLI demo covering intake, assessment, and queries
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum PortfolioCommand {
    /// Render the borrower table with optional search, filter, and sort
    List(PortfolioListArgs),
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
        Command::Portfolio {
            command: PortfolioCommand::List(args),
        } => run_portfolio_list(args),
        Command::Demo(args) => run_demo(args),
    }
}
