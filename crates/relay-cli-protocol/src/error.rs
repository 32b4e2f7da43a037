//! Error types for the relay-board protocol.

use thiserror::Error;

/// Errors that can occur when working with the relay-board protocol.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failed to parse a response payload.
    #[error("failed to parse response: {0}")]
    ParseError(String),

    /// The response did not echo the request header.
    #[error("invalid response to {header}: {line:?}")]
    UnexpectedResponse {
        /// Header of the request that was sent.
        header: String,
        /// The line that came back.
        line: String,
    },

    /// Invalid command format.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Timeout waiting for response.
    #[error("timeout waiting for response")]
    Timeout,

    /// Buffer overflow (command or response too long).
    #[error("buffer overflow: max {max} bytes, got {actual}")]
    BufferOverflow { max: usize, actual: usize },
}

/// Result type alias for protocol operations.
pub type CliResult<T> = Result<T, CliError>;
