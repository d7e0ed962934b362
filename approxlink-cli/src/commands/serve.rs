//! Serve commands - answer requests posted to the exchange directory.
//!
//! `serve` keeps running until Ctrl-C. `serve-once` answers the single
//! request that is pending right now, for hosts that drive the server from
//! a scheduler or a script.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use approxlink::config::MAX_POLL_INTERVAL_MS;
use approxlink::server::ApproximationServer;

use super::common::GlobalOptions;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the serve loop until interrupted.
pub fn run(options: &GlobalOptions, poll_interval_ms: Option<u64>) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("serve");

    let poll_interval = match poll_interval_ms {
        Some(ms) if ms == 0 || ms > MAX_POLL_INTERVAL_MS => {
            return Err(CliError::InvalidInput(format!(
                "poll interval must be between 1 and {} ms, got {}",
                MAX_POLL_INTERVAL_MS, ms
            )));
        }
        Some(ms) => Duration::from_millis(ms),
        None => runner.config().poll_interval(),
    };

    let ctx = runner.context()?;
    let server = ApproximationServer::new(&ctx);

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    println!("approxlink v{}", approxlink::VERSION);
    println!();
    println!("Serving:       {}", ctx.directory().root().display());
    println!("Model:         {}", ctx.directory().files().model);
    println!("Poll interval: {:?}", poll_interval);
    println!();
    println!("Press Ctrl+C to stop.");

    let stats = server.run(poll_interval, &shutdown);

    println!();
    println!(
        "Stopped. {} request(s) served, {} failed.",
        stats.served, stats.failed
    );
    Ok(())
}

/// Serve the pending request, if any.
///
/// Fails with `NotReady` when no request is pending, so scripts can tell
/// the two cases apart by exit code.
pub fn run_once(options: &GlobalOptions) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("serve-once");

    let ctx = runner.context()?;
    ApproximationServer::new(&ctx).serve_once()?;

    println!("Served request in {}", ctx.directory().root().display());
    Ok(())
}
