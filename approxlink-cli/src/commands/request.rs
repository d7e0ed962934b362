//! Request command - send one input vector and print the output.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::common::{print_vector, read_values, GlobalOptions};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `approxlink request`.
#[derive(Debug, Args)]
pub struct RequestArgs {
    /// Input values, in the order the model expects them
    #[arg(allow_negative_numbers = true, value_name = "VALUE")]
    pub values: Vec<f64>,

    /// Read the input vector from a file (one value per line) instead
    #[arg(long, conflicts_with = "values", value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Serve the request in this process instead of waiting for a server
    #[arg(long)]
    pub local: bool,

    /// Polls before giving up, overriding the config (0 = wait forever)
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Leave the busy flag set after reading the output
    #[arg(long)]
    pub keep_busy: bool,
}

/// Post a request and print the response, one value per line.
pub fn run(options: &GlobalOptions, args: RequestArgs) -> Result<(), CliError> {
    let input = read_values(args.values, args.input_file.as_deref())?;

    let runner = CliRunner::new(options)?;
    runner.log_startup("request");

    let ctx = runner.context()?;
    let client = runner.client(&ctx, args.local, args.max_attempts);

    let output = client.request(&input)?;
    if !args.keep_busy {
        client.release()?;
    }
    info!("request complete: {} -> {} values", input.len(), output.len());

    print_vector(&output);
    Ok(())
}
