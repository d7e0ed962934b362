//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use approxlink::config::{config_file_path, ConfigFile};
use approxlink::exchange::{TextVectorCodec, VectorCodec};
use clap::Args;

use crate::error::CliError;

/// Options accepted by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Config file to use instead of ~/.approxlink/config.ini
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Exchange directory, overriding [exchange] directory from the config
    #[arg(long, short = 'd', global = true, value_name = "DIR")]
    pub exchange_dir: Option<PathBuf>,

    /// Enable debug-level logging regardless of RUST_LOG
    #[arg(long, global = true)]
    pub debug: bool,

    /// Mirror log lines to stdout
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl GlobalOptions {
    /// Path of the config file in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }

    /// Load the config file (defaults when absent) and apply overrides.
    pub fn load_config(&self) -> Result<ConfigFile, CliError> {
        let mut config = ConfigFile::load_from(&self.config_path())?;
        if let Some(dir) = &self.exchange_dir {
            config.exchange.directory = dir.clone();
        }
        Ok(config)
    }
}

/// Vector given either inline on the command line or as a file.
pub fn read_values(values: Vec<f64>, file: Option<&Path>) -> Result<Vec<f64>, CliError> {
    match file {
        Some(path) => Ok(TextVectorCodec.load(path)?),
        None if values.is_empty() => Err(CliError::InvalidInput(
            "no values given; pass them as arguments or use --input-file".to_string(),
        )),
        None => Ok(values),
    }
}

/// Print a vector one value per line, the same layout as the exchange files.
pub fn print_vector(vector: &[f64]) {
    for value in vector {
        println!("{}", value);
    }
}
