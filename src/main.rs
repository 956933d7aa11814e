mod cli;
mod download;
mod error;
mod locator;
mod logging;
mod pipeline;
mod product;

use std::process::ExitCode;

use clap::Parser;
use cli::{command, Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::RadarOnly(args) => command::radar_only(args).await,
        Commands::PrecipRate(args) => command::precip_rate(args).await,
    };

    match result {
        Ok((destination, report)) => {
            println!("{}", command::summarise(&destination, &report));
            for timestamp in report.unresolved() {
                println!("missing {}", timestamp.format("%Y-%m-%dT%H:%M"));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
