//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::exchange::ExchangeFiles;
use crate::logging::default_log_file;

/// Exchange directory name under the config directory.
pub const DEFAULT_EXCHANGE_DIR_NAME: &str = "exchange";

/// Interval between flag checks in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Polls before a client gives up. 0 means wait forever.
pub const DEFAULT_MAX_WAIT_ATTEMPTS: u32 = 0;

/// Longest accepted poll interval (one minute).
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// Default exchange directory (~/.approxlink/exchange).
pub fn default_exchange_directory() -> PathBuf {
    config_directory().join(DEFAULT_EXCHANGE_DIR_NAME)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            exchange: ExchangeSettings {
                directory: default_exchange_directory(),
                files: ExchangeFiles::default(),
            },
            protocol: ProtocolSettings {
                poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
                max_wait_attempts: DEFAULT_MAX_WAIT_ATTEMPTS,
            },
            mapping: MappingSettings { enabled: false },
            logging: LoggingSettings {
                file: config_directory().join(default_log_file()),
            },
        }
    }
}
