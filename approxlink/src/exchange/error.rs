//! Error taxonomy of the exchange protocol.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::flags::Flag;
use crate::mapping::MappingError;
use crate::model::ModelError;

/// Errors raised by exchange operations.
///
/// None of these are retried inside the library. A caller that sees any of
/// them treats the request as not completed and may rerun the whole
/// sequence.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Server asked to serve while input-ready was clear
    #[error("no pending request: input-ready flag is not set")]
    NotReady,

    /// Expected data file missing at read time
    #[error("exchange file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Codec could not decode a file
    #[error("corrupt exchange file {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Caller's wait budget ran out before a flag appeared
    #[error("protocol error: {flag} flag not observed after {attempts} polls")]
    Protocol { flag: Flag, attempts: u32 },

    /// Exchange directory exists but cannot be written
    #[error("exchange directory {} is not writable: {source}", path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other filesystem failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Model collaborator failed to compute
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Mapping layer rejected a definition or vector
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl ExchangeError {
    /// Classify an I/O error on `path`, turning a missing file into `NotFound`.
    pub fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            ExchangeError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ExchangeError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Build a `Corrupt` error for `path`.
    pub fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        ExchangeError::Corrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_is_classified() {
        let err = ExchangeError::io(
            Path::new("/x/neural_output"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ExchangeError::NotFound { .. }));
        assert_eq!(err.to_string(), "exchange file not found: /x/neural_output");
    }

    #[test]
    fn test_io_other_kind_stays_io() {
        let err = ExchangeError::io(
            Path::new("/x/neural_input"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ExchangeError::Io { .. }));
    }

    #[test]
    fn test_protocol_message_names_flag() {
        let err = ExchangeError::Protocol {
            flag: Flag::OutputReady,
            attempts: 3,
        };
        assert_eq!(
            err.to_string(),
            "protocol error: output-ready flag not observed after 3 polls"
        );
    }
}
