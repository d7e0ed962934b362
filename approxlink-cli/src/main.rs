//! approxlink CLI - Command-line interface
//!
//! This binary hosts the approxlink exchange: it runs the server side of the
//! protocol and offers client-side commands for scripts and debugging.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::common::GlobalOptions;
use commands::config::ConfigCommands;
use commands::evaluate::EvaluateArgs;
use commands::flags::FlagsCommands;
use commands::mapping::MappingCommands;
use commands::request::RequestArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "approxlink")]
#[command(version = approxlink::VERSION)]
#[command(about = "File-based request/response exchange for trained approximators", long_about = None)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve requests from the exchange directory until Ctrl+C
    Serve {
        /// Milliseconds between flag checks (default: from config)
        #[arg(long, value_name = "MS")]
        poll_interval_ms: Option<u64>,
    },

    /// Serve the pending request and exit; fails if none is pending
    ServeOnce,

    /// Send one input vector and print the output
    Request(RequestArgs),

    /// Evaluate in reduced space through the mapping files
    Evaluate(EvaluateArgs),

    /// Inspect or clear the protocol flags
    Flags {
        #[command(subcommand)]
        command: FlagsCommands,
    },

    /// Inspect the mapping definition
    Mapping {
        #[command(subcommand)]
        command: MappingCommands,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let options = cli.options;
    match cli.command {
        Commands::Serve { poll_interval_ms } => commands::serve::run(&options, poll_interval_ms),
        Commands::ServeOnce => commands::serve::run_once(&options),
        Commands::Request(args) => commands::request::run(&options, args),
        Commands::Evaluate(args) => commands::evaluate::run(&options, args),
        Commands::Flags { command } => commands::flags::run(&options, command),
        Commands::Mapping { command } => commands::mapping::run(&options, command),
        Commands::Config { command } => commands::config::run(&options, command),
    }
}
