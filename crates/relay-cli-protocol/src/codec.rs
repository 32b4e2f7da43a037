//! Line-based codec for relay-board communication.
//!
//! Requests are prefixed with `RB+` and responses with `+`. Both directions
//! terminate lines with `\n`; a preceding `\r` is tolerated on receive.

use bytes::BytesMut;

use crate::error::{CliError, CliResult};

/// Maximum request/response line length.
pub const MAX_LINE_LENGTH: usize = 128;

/// Prefix of every request sent to the firmware.
pub const REQUEST_PREFIX: &str = "RB+";

/// Prefix of every response from the firmware.
pub const RESPONSE_PREFIX: &str = "+";

/// Separates the header from the payload.
pub const PAYLOAD_SEPARATOR: char = '=';

/// Line terminator.
pub const MESSAGE_SEPARATOR: u8 = b'\n';

/// A codec for reading and writing protocol lines.
///
/// Accumulates received bytes until a complete line is available.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl LineCodec {
    /// Create a new line codec.
    pub fn new() -> Self {
        LineCodec {
            buffer: BytesMut::with_capacity(MAX_LINE_LENGTH * 2),
        }
    }

    /// Add received data to the buffer.
    ///
    /// Fails if the buffer grows past [`MAX_LINE_LENGTH`] without a terminator.
    pub fn push(&mut self, data: &[u8]) -> CliResult<()> {
        self.buffer.extend_from_slice(data);
        if self.buffer.len() > MAX_LINE_LENGTH && !self.has_line() {
            let actual = self.buffer.len();
            log::debug!("discarding unterminated input: {:?}", self.buffer_as_str());
            self.buffer.clear();
            return Err(CliError::BufferOverflow {
                max: MAX_LINE_LENGTH,
                actual,
            });
        }
        Ok(())
    }

    /// Whether a complete line is buffered.
    pub fn has_line(&self) -> bool {
        self.buffer.contains(&MESSAGE_SEPARATOR)
    }

    /// Try to decode a complete line from the buffer.
    ///
    /// The terminator and any trailing `\r` are stripped; empty lines are
    /// skipped. Returns `None` if more data is needed.
    pub fn decode_line(&mut self) -> Option<String> {
        loop {
            let end = self.buffer.iter().position(|&b| b == MESSAGE_SEPARATOR)?;
            let mut line_data = self.buffer.split_to(end + 1);
            line_data.truncate(end);
            while line_data.last() == Some(&b'\r') {
                line_data.truncate(line_data.len() - 1);
            }
            if line_data.is_empty() {
                continue;
            }
            let line = String::from_utf8_lossy(&line_data).to_string();
            log::trace!("decoded line {:?}", line);
            return Some(line);
        }
    }

    /// Encode a request for transmission.
    ///
    /// The payload separator is only added for a non-empty payload.
    pub fn encode_request(header: &str, payload: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(REQUEST_PREFIX.len() + header.len() + payload.len() + 2);
        buf.extend_from_slice(REQUEST_PREFIX.as_bytes());
        buf.extend_from_slice(header.as_bytes());
        if !payload.is_empty() {
            buf.push(PAYLOAD_SEPARATOR as u8);
            buf.extend_from_slice(payload.as_bytes());
        }
        buf.push(MESSAGE_SEPARATOR);
        buf
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Get the current buffer contents as a string (for debugging).
    pub fn buffer_as_str(&self) -> String {
        String::from_utf8_lossy(&self.buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_request() {
        assert_eq!(LineCodec::encode_request("SERIAL", ""), b"RB+SERIAL\n");
        assert_eq!(LineCodec::encode_request("SET", "1-O,2-C"), b"RB+SET=1-O,2-C\n");
    }

    #[test]
    fn test_decode_line() {
        let mut codec = LineCodec::new();
        codec.push(b"+HW=1.2\n+FW=0.9\n").unwrap();

        assert_eq!(codec.decode_line(), Some("+HW=1.2".to_string()));
        assert_eq!(codec.decode_line(), Some("+FW=0.9".to_string()));
        assert!(codec.decode_line().is_none());
        assert_eq!(codec.buffered_len(), 0);
    }

    #[test]
    fn test_partial_line() {
        let mut codec = LineCodec::new();
        codec.push(b"+SER").unwrap();
        assert!(!codec.has_line());
        assert!(codec.decode_line().is_none());

        codec.push(b"IAL=RB00D30GR9J1\r\n").unwrap();
        assert_eq!(codec.decode_line(), Some("+SERIAL=RB00D30GR9J1".to_string()));
    }

    #[test]
    fn test_skips_empty_lines() {
        let mut codec = LineCodec::new();
        codec.push(b"\r\n\n+GET\n").unwrap();
        assert_eq!(codec.decode_line(), Some("+GET".to_string()));
    }

    #[test]
    fn test_overflow() {
        let mut codec = LineCodec::new();
        let junk = vec![b'x'; MAX_LINE_LENGTH + 1];
        assert!(matches!(
            codec.push(&junk),
            Err(CliError::BufferOverflow { .. })
        ));
        assert_eq!(codec.buffered_len(), 0);
    }
}
