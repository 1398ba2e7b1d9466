//! migsnap - turn MySQL dumps and databases into Laravel migrations.

use clap::Parser;

use migsnap_cli::cli::{Cli, Command};
use migsnap_cli::commands;
use migsnap_cli::error::CliResult;
use migsnap_cli::logging;
use migsnap_cli::output;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        output::newline();
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Import(args) => commands::import::run(args).await,
        Command::Generate(args) => commands::generate::run(args).await,
        Command::Version => commands::version::run().await,
    }
}
