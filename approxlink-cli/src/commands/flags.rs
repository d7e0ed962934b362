//! Flag inspection and recovery commands.
//!
//! A client that dies mid-request leaves `busy` behind. These commands show
//! the flag files and clear them without starting a server.

use std::sync::Arc;

use approxlink::exchange::{ExchangeDirectory, Flag, FlagNotifier, FlagProtocol};
use approxlink::log::NoOpLogger;
use clap::{Subcommand, ValueEnum};

use super::common::GlobalOptions;
use crate::error::CliError;

/// Flag subcommands.
#[derive(Debug, Subcommand)]
pub enum FlagsCommands {
    /// Show which flags are set
    Show,

    /// Clear one flag, or all of them
    Clear {
        /// Flag to clear (default: all)
        #[arg(value_enum)]
        flag: Option<FlagArg>,
    },
}

/// Flag selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum FlagArg {
    /// Request in flight
    Busy,
    /// Input waiting to be served
    InputReady,
    /// Output waiting to be read
    OutputReady,
}

impl From<FlagArg> for Flag {
    fn from(arg: FlagArg) -> Self {
        match arg {
            FlagArg::Busy => Flag::Busy,
            FlagArg::InputReady => Flag::InputReady,
            FlagArg::OutputReady => Flag::OutputReady,
        }
    }
}

/// Run a flags subcommand.
pub fn run(options: &GlobalOptions, command: FlagsCommands) -> Result<(), CliError> {
    let flags = open_flags(options)?;
    match command {
        FlagsCommands::Show => run_show(&flags),
        FlagsCommands::Clear { flag } => run_clear(&flags, flag.map(Flag::from)),
    }
}

fn open_flags(options: &GlobalOptions) -> Result<FlagProtocol, CliError> {
    let config = options.load_config()?;
    let directory = ExchangeDirectory::open(&config.exchange.directory, config.exchange.files)?;
    Ok(FlagProtocol::new(
        Arc::new(directory),
        Arc::new(FlagNotifier::new()),
        Arc::new(NoOpLogger),
    ))
}

fn run_show(flags: &FlagProtocol) -> Result<(), CliError> {
    println!("Exchange directory: {}", flags.directory().root().display());
    println!();
    for flag in Flag::ALL {
        let state = if flags.is_set(flag) { "set" } else { "clear" };
        println!(
            "  {:<14} {:<6} ({})",
            flag.to_string(),
            state,
            flags.directory().files().flag_file(flag)
        );
    }
    if flags.snapshot().is_idle() {
        println!();
        println!("Idle.");
    }
    Ok(())
}

fn run_clear(flags: &FlagProtocol, flag: Option<Flag>) -> Result<(), CliError> {
    match flag {
        Some(flag) => {
            flags.clear(flag)?;
            println!("Cleared {}", flag);
        }
        None => {
            flags.clear_all()?;
            println!("Cleared all flags");
        }
    }
    Ok(())
}
