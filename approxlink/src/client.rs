//! Client side of the exchange: issues one request at a time.

use crate::context::ExchangeContext;
use crate::exchange::{ExchangeError, Flag, FlagProtocol, VectorExchange, WaitPolicy};
use crate::log::Logger;
use crate::{log_debug, log_warn};
use std::sync::Arc;

/// Something that makes a server look at the exchange directory.
///
/// In-process hosting passes the server itself; a split deployment relies on
/// the server's own polling and passes [`ExternalServer`].
pub trait ServerTrigger: Send + Sync {
    /// Prompt the server to serve the pending request.
    fn trigger(&self) -> Result<(), ExchangeError>;
}

/// Trigger for a server running in another process. Does nothing; the
/// input-ready flag is the signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalServer;

impl ServerTrigger for ExternalServer {
    fn trigger(&self) -> Result<(), ExchangeError> {
        Ok(())
    }
}

/// Issues requests through the exchange directory.
///
/// Requests are strictly sequential. After [`request`](Self::request)
/// returns, `busy` stays set until the caller has consumed the result and
/// calls [`release`](Self::release).
pub struct ApproximationClient {
    flags: FlagProtocol,
    vectors: VectorExchange,
    trigger: Arc<dyn ServerTrigger>,
    policy: WaitPolicy,
    logger: Arc<dyn Logger>,
}

impl ApproximationClient {
    pub fn new(ctx: &ExchangeContext, trigger: Arc<dyn ServerTrigger>, policy: WaitPolicy) -> Self {
        Self {
            flags: ctx.flags(),
            vectors: ctx.vectors(),
            trigger,
            policy,
            logger: Arc::clone(ctx.logger()),
        }
    }

    pub fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Send `input` and wait for the server's output.
    ///
    /// # Errors
    ///
    /// `Protocol` if output-ready does not appear within the wait policy;
    /// any error from the trigger, the codec or the filesystem as-is. No
    /// partial result is returned.
    pub fn request(&self, input: &[f64]) -> Result<Vec<f64>, ExchangeError> {
        if self.flags.is_set(Flag::Busy) {
            log_warn!(
                self.logger,
                "busy flag already set in {}; previous request was not released",
                self.flags.directory().root().display()
            );
        }

        self.flags.set(Flag::Busy)?;
        self.flags.clear(Flag::InputReady)?;
        self.vectors.write_input(input)?;
        self.flags.set(Flag::InputReady)?;
        log_debug!(self.logger, "request posted with {} values", input.len());

        self.trigger.trigger()?;

        self.flags.wait_for(Flag::OutputReady, &self.policy)?;
        let output = self.vectors.read_output()?;
        self.flags.clear(Flag::OutputReady)?;
        log_debug!(self.logger, "response received with {} values", output.len());
        Ok(output)
    }

    /// Mark the channel free for the next request.
    pub fn release(&self) -> Result<(), ExchangeError> {
        self.flags.clear(Flag::Busy)
    }

    pub fn is_busy(&self) -> bool {
        self.flags.is_set(Flag::Busy)
    }
}
