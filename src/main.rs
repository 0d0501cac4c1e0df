//! jasmine-headless - run Jasmine specs in a headless browser engine
//!
//! Resolves a jasmine.yml, hands the resulting runner page to the spec
//! runner binary and exits with whatever code the spec runner exited with.

use clap::Parser;
use jasmine_headless::commands::{Commands, RunArgs};
use jasmine_headless::{cli, common::logging};

#[derive(Parser)]
#[command(name = "jasmine-headless", about = "Headless Jasmine spec runner")]
#[command(version, long_about = None, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run(cli.run));

    match cli::dispatch(command).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
