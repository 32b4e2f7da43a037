//! Error types for the runner.

use relay_cli_protocol::CliError;
use relay_pattern::PatternError;
use relay_serial::SerialNumberError;
use thiserror::Error;

/// Errors that can occur while driving relay boards.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Serial number could not be encoded or decoded.
    #[error("Serial number error: {0}")]
    SerialNumber(#[from] SerialNumberError),

    /// Protocol framing or response error.
    #[error("Protocol error: {0}")]
    Protocol(#[from] CliError),

    /// Pattern file error.
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// I/O error on the transport.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port could not be enumerated or opened.
    #[error("Serial port error: {0}")]
    Port(#[from] serialport::Error),

    /// Neither a serial number nor a pattern file was given.
    #[error("No serial number or pattern file given")]
    MissingTarget,

    /// No USB serial port matches the device number.
    #[error("No serial port found for device number {0}")]
    PortNotFound(String),

    /// Relays did not reach the requested level.
    #[error("Relays {missing:?} not set on {serial_number}")]
    StateMismatch {
        /// Board serial number.
        serial_number: String,
        /// Requested relay entries missing from the read-back state.
        missing: Vec<String>,
    },
}

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
