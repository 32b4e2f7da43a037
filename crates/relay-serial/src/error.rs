//! Error types for relay-serial.

use thiserror::Error;

/// Errors that can occur while encoding or decoding serial numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerialNumberError {
    /// Wrong length, wrong prefix, or otherwise malformed identifier.
    #[error("Invalid serial number {serial_number:?}: {reason}")]
    Format {
        /// The offending identifier.
        serial_number: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A character outside the base-36 alphabet.
    #[error("Invalid base-36 digit {digit:?} at position {position}")]
    InvalidDigit {
        /// The offending character.
        digit: char,
        /// Character index within the decoded text.
        position: usize,
    },

    /// The recomputed CRC does not match the CRC carried in the identifier.
    #[error("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    Integrity {
        /// CRC carried in the encoded identifier.
        expected: u8,
        /// CRC recomputed over the recovered plain identifier.
        actual: u8,
    },
}

impl SerialNumberError {
    /// Create a format error for the given identifier.
    pub fn format(serial_number: impl Into<String>, reason: impl Into<String>) -> Self {
        SerialNumberError::Format {
            serial_number: serial_number.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error signals corruption or tampering.
    pub fn is_integrity(&self) -> bool {
        matches!(self, SerialNumberError::Integrity { .. })
    }
}

/// Result type for serial-number operations.
pub type SerialResult<T> = Result<T, SerialNumberError>;
