//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;
use std::time::Duration;

use crate::exchange::{ExchangeFiles, WaitPolicy};

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub exchange: ExchangeSettings,
    pub protocol: ProtocolSettings,
    pub mapping: MappingSettings,
    pub logging: LoggingSettings,
}

/// Exchange directory location and file names.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeSettings {
    /// Shared directory both parties read and write
    pub directory: PathBuf,
    /// Name of every data and flag file inside it
    pub files: ExchangeFiles,
}

/// Client wait discipline.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolSettings {
    /// Interval between flag re-checks, also the serve loop's idle wait
    pub poll_interval_ms: u64,
    /// Polls before a client gives up; 0 waits forever
    pub max_wait_attempts: u32,
}

/// Reduced-space evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSettings {
    /// Translate through the mapping and data definition files
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl ConfigFile {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.protocol.poll_interval_ms)
    }

    /// Wait policy for clients built from this configuration.
    pub fn wait_policy(&self) -> WaitPolicy {
        let policy = WaitPolicy::new().with_poll_interval(self.poll_interval());
        match self.protocol.max_wait_attempts {
            0 => policy.without_limit(),
            attempts => policy.with_max_attempts(attempts),
        }
    }
}
