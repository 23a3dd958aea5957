pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "cryptoprice",
    about = "Crypto Price skill operator CLI",
    long_about = "Inspect configuration, probe the spot price API, and replay skill request envelopes.",
    after_help = "Examples:\n  cryptoprice doctor --json\n  cryptoprice lookup ether euros\n  cryptoprice invoke launch.json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and probe the spot price API")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Resolve spoken currency names and fetch the current spot price")]
    Lookup {
        #[arg(help = "Cryptocurrency as spoken, e.g. `bitcoin` or `ether` (default: bitcoin)")]
        cryptocurrency: Option<String>,
        #[arg(help = "Fiat currency as spoken, e.g. `euros` (default: US dollars)")]
        fiat_currency: Option<String>,
    },
    #[command(about = "Dispatch a request envelope JSON file and print the response envelope")]
    Invoke {
        #[arg(help = "Path to the request envelope JSON file")]
        path: PathBuf,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Lookup { cryptocurrency, fiat_currency } => {
            commands::lookup::run(cryptocurrency.as_deref(), fiat_currency.as_deref())
        }
        Command::Invoke { path } => commands::invoke::run(&path),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
