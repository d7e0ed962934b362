//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use approxlink::config::ConfigFileError;
use approxlink::exchange::{ExchangeError, Flag};
use approxlink::mapping::MappingError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Config file could not be read, parsed or written
    ConfigFile(ConfigFileError),
    /// Exchange protocol failure
    Exchange(ExchangeError),
    /// Bad command-line input
    InvalidInput(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Exchange(ExchangeError::Protocol {
                flag: Flag::OutputReady,
                ..
            }) => {
                eprintln!();
                eprintln!("No server answered the request. Either:");
                eprintln!("  1. Start a server on the same directory: approxlink serve");
                eprintln!("  2. Or serve it in this process: add --local");
                eprintln!("The busy flag was left set; clear it with: approxlink flags clear");
            }
            CliError::Exchange(ExchangeError::NotReady) => {
                eprintln!();
                eprintln!("Check the flags with: approxlink flags show");
            }
            CliError::Exchange(ExchangeError::Mapping(e)) if e.is_inconsistent() => {
                eprintln!();
                eprintln!("The mapping does not match the model's data definition.");
                eprintln!("Inspect it with: approxlink mapping check");
            }
            CliError::ConfigFile(_) => {
                eprintln!();
                eprintln!("Show the config file location with: approxlink config path");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Exchange(e) => write!(f, "{}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Exchange(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExchangeError> for CliError {
    fn from(e: ExchangeError) -> Self {
        CliError::Exchange(e)
    }
}

impl From<MappingError> for CliError {
    fn from(e: MappingError) -> Self {
        CliError::Exchange(ExchangeError::Mapping(e))
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_error_passes_through_message() {
        let err: CliError = ExchangeError::NotReady.into();
        assert_eq!(
            err.to_string(),
            "no pending request: input-ready flag is not set"
        );
    }

    #[test]
    fn test_mapping_error_is_wrapped_as_exchange() {
        let err: CliError = MappingError::MissingDefinition("data definition").into();
        assert!(matches!(
            err,
            CliError::Exchange(ExchangeError::Mapping(MappingError::MissingDefinition(_)))
        ));
    }

    #[test]
    fn test_invalid_input_message() {
        let err = CliError::InvalidInput("no values given".to_string());
        assert_eq!(err.to_string(), "Invalid input: no values given");
    }
}
