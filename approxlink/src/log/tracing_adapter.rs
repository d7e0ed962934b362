//! Tracing library adapter implementation.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Logger implementation that delegates to the `tracing` crate.
///
/// Messages carry the `approxlink` target so a host can filter exchange
/// traffic with `RUST_LOG=approxlink=debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Create a new tracing logger adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "approxlink", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "approxlink", "{}", args),
            LogLevel::Info => tracing::info!(target: "approxlink", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "approxlink", "{}", args),
            LogLevel::Error => tracing::error!(target: "approxlink", "{}", args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TracingLogger>();
    }

    #[test]
    fn test_tracing_logger_without_subscriber() {
        // No subscriber installed: calls must still be harmless.
        let logger: Box<dyn Logger> = Box::new(TracingLogger::new());
        logger.info(format_args!("served request {}", 1));
        logger.debug(format_args!("flag set"));
    }
}
