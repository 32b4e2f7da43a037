//! Error types for pattern files.

use relay_serial::SerialNumberError;
use thiserror::Error;

/// Errors that can occur while loading or querying a pattern file.
#[derive(Debug, Error)]
pub enum PatternError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON or a value of the wrong type.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required top-level key is absent.
    #[error("{0} not in json file")]
    MissingKey(&'static str),

    /// The `aliases` table is empty.
    #[error("No aliases defined")]
    NoAliases,

    /// An alias maps to an invalid serial number.
    #[error("Alias {alias}: {source}")]
    SerialNumber {
        /// The alias whose serial number failed to decode.
        alias: String,
        /// The codec error, unchanged.
        #[source]
        source: SerialNumberError,
    },

    /// Two aliases map to the same serial number.
    #[error("Duplicate serial-number {0}")]
    DuplicateSerialNumber(String),

    /// The `patterns` table is empty.
    #[error("No patterns defined")]
    NoPatterns,

    /// A pattern lists no aliases.
    #[error("Pattern {0} empty")]
    EmptyPattern(String),

    /// A pattern refers to an alias that is not defined.
    #[error("Pattern {pattern}: alias {alias} not defined")]
    UndefinedAlias {
        /// Pattern name.
        pattern: String,
        /// The undefined alias.
        alias: String,
    },

    /// No pattern was named and the file holds more than one.
    #[error("Pattern undetermined. Use one of {0:?}")]
    Undetermined(Vec<String>),

    /// The named pattern does not exist.
    #[error("Couldn't find pattern {0}")]
    UnknownPattern(String),

    /// No alias maps to the serial number.
    #[error("Serial number {0} has no alias")]
    UnknownSerialNumber(String),
}

/// Result type for pattern operations.
pub type PatternResult<T> = Result<T, PatternError>;
