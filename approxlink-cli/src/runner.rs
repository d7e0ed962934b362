//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization and exchange context creation
//! to reduce duplication across command handlers.

use std::sync::Arc;

use approxlink::client::{ApproximationClient, ExternalServer, ServerTrigger};
use approxlink::config::ConfigFile;
use approxlink::context::ExchangeContext;
use approxlink::exchange::{ExchangeDirectory, WaitPolicy};
use approxlink::log::TracingLogger;
use approxlink::logging::{default_log_file, init_logging, LoggingGuard};
use approxlink::server::ApproximationServer;
use tracing::info;

use crate::commands::common::GlobalOptions;
use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file, with command-line overrides applied
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// Log lines go to the configured file. `--verbose` mirrors them to stdout.
    pub fn new(options: &GlobalOptions) -> Result<Self, CliError> {
        let config = options.load_config()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| ".".into());
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| default_log_file().to_string());

        let logging_guard = init_logging(&log_dir, &log_file, options.verbose, options.debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("approxlink v{}", approxlink::VERSION);
        info!("approxlink CLI: {} command", command);
        info!(
            "Exchange directory: {}",
            self.config.exchange.directory.display()
        );
    }

    /// Open the exchange directory and build a context logging through `tracing`.
    pub fn context(&self) -> Result<ExchangeContext, CliError> {
        let directory = ExchangeDirectory::open(
            &self.config.exchange.directory,
            self.config.exchange.files.clone(),
        )?;
        Ok(ExchangeContext::builder(directory)
            .logger(Arc::new(TracingLogger))
            .build())
    }

    /// Build a client for `ctx`.
    ///
    /// With `local`, requests are served in this process by an
    /// [`ApproximationServer`] on the same context. Otherwise a separately
    /// running `approxlink serve` (or any other party) must answer.
    pub fn client(
        &self,
        ctx: &ExchangeContext,
        local: bool,
        max_attempts: Option<u32>,
    ) -> ApproximationClient {
        let trigger: Arc<dyn ServerTrigger> = if local {
            Arc::new(ApproximationServer::new(ctx))
        } else {
            Arc::new(ExternalServer)
        };
        ApproximationClient::new(ctx, trigger, self.wait_policy(max_attempts))
    }

    fn wait_policy(&self, max_attempts: Option<u32>) -> WaitPolicy {
        match max_attempts {
            Some(0) => self.config.wait_policy().without_limit(),
            Some(attempts) => self.config.wait_policy().with_max_attempts(attempts),
            None => self.config.wait_policy(),
        }
    }
}
