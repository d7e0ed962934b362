//! User configuration in `~/.approxlink/config.ini`.
//!
//! ```
//! use approxlink::config::ConfigFile;
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let path = temp.path().join("config.ini");
//! std::fs::write(&path, "[protocol]\nmax_wait_attempts = 200\n").unwrap();
//!
//! let config = ConfigFile::load_from(&path).unwrap();
//! assert_eq!(config.wait_policy().max_attempts(), Some(200));
//! assert_eq!(config.exchange.files.input, "neural_input");
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_exchange_directory, DEFAULT_MAX_WAIT_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS,
    MAX_POLL_INTERVAL_MS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, ExchangeSettings, LoggingSettings, MappingSettings, ProtocolSettings,
};
