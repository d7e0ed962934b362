//! Evaluate command - reduced-space evaluation through the mapping files.
//!
//! With `[mapping] enabled = true` the input is expanded through
//! `mapping_definition` and `neural_data_definition` before the request, and
//! the output reduced again afterwards. Otherwise vectors pass through as-is.

use std::sync::Arc;

use approxlink::function::MappedFunction;
use approxlink::mapping::DataMapper;
use clap::Args;
use tracing::info;

use super::common::{print_vector, GlobalOptions};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `approxlink evaluate`.
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Reduced input values; when omitted, function_input is read and the
    /// result written to function_output
    #[arg(allow_negative_numbers = true, value_name = "VALUE")]
    pub values: Vec<f64>,

    /// Serve the request in this process instead of waiting for a server
    #[arg(long)]
    pub local: bool,

    /// Polls before giving up, overriding the config (0 = wait forever)
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Skip the mapping files even when the config enables them
    #[arg(long)]
    pub no_mapping: bool,
}

/// Evaluate once and print the reduced output.
pub fn run(options: &GlobalOptions, args: EvaluateArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("evaluate");

    let ctx = runner.context()?;
    let mapper = if runner.config().mapping.enabled && !args.no_mapping {
        ctx.load_mapper()?
    } else {
        DataMapper::identity()
    };
    info!(
        "evaluating with {} mapper",
        if mapper.is_identity() { "identity" } else { "simple" }
    );

    let client = runner.client(&ctx, args.local, args.max_attempts);
    let function = MappedFunction::new(mapper, client, ctx.vectors(), Arc::clone(ctx.logger()));

    let result = if args.values.is_empty() {
        function.evaluate_files()?
    } else {
        function.evaluate(&args.values)?
    };

    print_vector(&result);
    Ok(())
}
