//! Server side of the exchange: consumes pending requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::client::ServerTrigger;
use crate::context::ExchangeContext;
use crate::exchange::{ExchangeError, Flag, FlagProtocol, VectorExchange};
use crate::log::Logger;
use crate::{log_debug, log_error, log_info};

/// Counters reported by [`ApproximationServer::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    /// Requests answered with an output
    pub served: u64,
    /// Requests that ended in an error
    pub failed: u64,
}

/// Answers requests found in the exchange directory.
///
/// The model is loaded fresh for every request, so a retrained artifact is
/// picked up without restarting. `busy` is never cleared here; the client
/// that issued the request owns that transition.
#[derive(Clone)]
pub struct ApproximationServer {
    flags: FlagProtocol,
    vectors: VectorExchange,
    logger: Arc<dyn Logger>,
}

impl ApproximationServer {
    pub fn new(ctx: &ExchangeContext) -> Self {
        Self {
            flags: ctx.flags(),
            vectors: ctx.vectors(),
            logger: Arc::clone(ctx.logger()),
        }
    }

    /// Serve the pending request.
    ///
    /// # Errors
    ///
    /// `NotReady` if input-ready is clear; nothing is touched in that case.
    /// Read, model and write failures surface as-is, with input-ready
    /// already cleared and output-ready not set.
    pub fn serve_once(&self) -> Result<(), ExchangeError> {
        if !self.flags.is_set(Flag::InputReady) {
            return Err(ExchangeError::NotReady);
        }
        let started = Instant::now();

        if !self.flags.is_set(Flag::Busy) {
            log_debug!(self.logger, "request arrived without busy flag, setting it");
            self.flags.set(Flag::Busy)?;
        }
        if self.flags.is_set(Flag::OutputReady) {
            log_debug!(self.logger, "clearing stale output-ready flag");
            self.flags.clear(Flag::OutputReady)?;
        }
        self.flags.clear(Flag::InputReady)?;

        let input = self.vectors.read_input()?;
        let model = self.vectors.load_model()?;
        let output = model.compute(&input)?;
        self.vectors.write_output(&output)?;
        self.flags.set(Flag::OutputReady)?;

        log_info!(
            self.logger,
            "served request: {} inputs -> {} outputs in {:?}",
            input.len(),
            output.len(),
            started.elapsed()
        );
        Ok(())
    }

    /// Serve if a request is pending.
    ///
    /// Returns `Ok(false)` when input-ready is clear.
    pub fn poll_once(&self) -> Result<bool, ExchangeError> {
        if !self.flags.is_set(Flag::InputReady) {
            return Ok(false);
        }
        self.serve_once().map(|()| true)
    }

    /// Serve requests until `shutdown` is raised.
    ///
    /// Between requests the loop waits up to `poll_interval` for input-ready,
    /// waking early when a client in this process sets it. A failed request
    /// is logged and counted; it never ends the loop.
    pub fn run(&self, poll_interval: Duration, shutdown: &AtomicBool) -> ServeStats {
        let mut stats = ServeStats::default();
        log_info!(
            self.logger,
            "serving {} (poll interval {:?})",
            self.flags.directory().root().display(),
            poll_interval
        );

        while !shutdown.load(Ordering::SeqCst) {
            if !self.flags.poll(Flag::InputReady, poll_interval) {
                continue;
            }
            match self.serve_once() {
                Ok(()) => stats.served += 1,
                // Another server claimed it between poll and serve
                Err(ExchangeError::NotReady) => {}
                Err(e) => {
                    stats.failed += 1;
                    log_error!(self.logger, "request failed: {}", e);
                }
            }
        }

        log_info!(
            self.logger,
            "server stopped: {} served, {} failed",
            stats.served,
            stats.failed
        );
        stats
    }
}

impl ServerTrigger for ApproximationServer {
    fn trigger(&self) -> Result<(), ExchangeError> {
        self.serve_once()
    }
}
