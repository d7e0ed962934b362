//! Mapping error types.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::element::MappingDirection;

/// A single rule a mapping definition broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two elements point at the same original position
    DuplicateOriginalIndex {
        index: usize,
        first: usize,
        second: usize,
    },
    /// Two elements claim the same reduced slot
    DuplicateMappedIndex {
        index: usize,
        first: usize,
        second: usize,
    },
    /// Element name differs from the data definition's name at that position
    NameMismatch {
        element: usize,
        index: usize,
        expected: String,
        found: String,
    },
    /// Index beyond the vector it addresses
    IndexOutOfRange {
        element: usize,
        index: usize,
        len: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DuplicateOriginalIndex {
                index,
                first,
                second,
            } => write!(
                f,
                "elements {} and {} share original index {}",
                first, second, index
            ),
            Violation::DuplicateMappedIndex {
                index,
                first,
                second,
            } => write!(
                f,
                "elements {} and {} share mapped index {}",
                first, second, index
            ),
            Violation::NameMismatch {
                element,
                index,
                expected,
                found,
            } => write!(
                f,
                "element {} is named '{}' but the data definition names index {} '{}'",
                element, found, index, expected
            ),
            Violation::IndexOutOfRange {
                element,
                index,
                len,
            } => write!(
                f,
                "element {} uses index {} outside a vector of length {}",
                element, index, len
            ),
        }
    }
}

/// Errors raised by the mapping layer.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Definition fails a uniqueness, name or range check
    #[error("inconsistent {direction} mapping: {violation}")]
    Inconsistent {
        direction: MappingDirection,
        violation: Violation,
    },

    /// A mapped translation was requested without its definitions
    #[error("argument error: {0} is required for a mapped translation")]
    MissingDefinition(&'static str),

    /// Vector handed to the mapper has the wrong length
    #[error("argument error: {what} vector has length {actual}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Definition file could not be read or written
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Definition file is not valid JSON of the expected shape
    #[error("cannot parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

impl MappingError {
    /// True for the inconsistent-mapping family of errors.
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, MappingError::Inconsistent { .. })
    }

    /// True for the argument-error family of errors.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            MappingError::MissingDefinition(_) | MappingError::LengthMismatch { .. }
        )
    }
}
