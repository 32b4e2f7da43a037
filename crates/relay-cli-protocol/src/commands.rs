//! Commands that can be sent to the relay-board firmware.
//!
//! - Info commands (serial number, hardware and firmware version)
//! - Relay commands (set and get relay levels)

use crate::codec::LineCodec;
use crate::error::{CliError, CliResult};

/// Level a relay can be driven to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayLevel {
    /// Relay contact open (`O`).
    Open,
    /// Relay contact closed (`C`).
    Close,
}

impl RelayLevel {
    /// Get the level code used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayLevel::Open => "O",
            RelayLevel::Close => "C",
        }
    }

    /// Parse a level code. Anything other than `C` reads as open.
    pub fn from_code(s: &str) -> RelayLevel {
        if s == "C" {
            RelayLevel::Close
        } else {
            RelayLevel::Open
        }
    }
}

/// A single relay and the level to drive it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelayAction {
    /// Relay id as printed on the board.
    pub relay: u32,
    /// Target level.
    pub level: RelayLevel,
}

impl RelayAction {
    /// Create an open action.
    pub fn open(relay: u32) -> Self {
        RelayAction {
            relay,
            level: RelayLevel::Open,
        }
    }

    /// Create a close action.
    pub fn close(relay: u32) -> Self {
        RelayAction {
            relay,
            level: RelayLevel::Close,
        }
    }

    /// Encode as `<id>-<level>`.
    pub fn to_wire(&self) -> String {
        format!("{}-{}", self.relay, self.level.as_str())
    }

    /// Parse `<id>-<level>`.
    pub fn parse(s: &str) -> CliResult<RelayAction> {
        let (id, level) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| CliError::ParseError(format!("missing '-' in relay entry: {}", s)))?;
        let relay: u32 = id
            .parse()
            .map_err(|_| CliError::ParseError(format!("invalid relay id: {}", id)))?;
        Ok(RelayAction {
            relay,
            level: RelayLevel::from_code(level),
        })
    }
}

/// Commands that can be sent to the relay-board firmware.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ========== Info Commands ==========
    /// Read the serial number stored in the board.
    Serial,

    /// Read the hardware version.
    HardwareVersion,

    /// Read the firmware version.
    FirmwareVersion,

    // ========== Relay Commands ==========
    /// Drive the given relays.
    SetRelays {
        /// Relays to change; others keep their level.
        actions: Vec<RelayAction>,
    },

    /// Read the level of every relay.
    GetRelays,

    // ========== Raw Command ==========
    /// Send a raw header and payload.
    Raw {
        /// The request header.
        header: String,
        /// The payload (empty for none).
        payload: String,
    },
}

impl Command {
    /// Header sent with the request and expected back in the response.
    pub fn header(&self) -> &str {
        match self {
            Command::Serial => "SERIAL",
            Command::HardwareVersion => "HW",
            Command::FirmwareVersion => "FW",
            Command::SetRelays { .. } => "SET",
            Command::GetRelays => "GET",
            Command::Raw { header, .. } => header,
        }
    }

    /// Payload sent after the `=` separator (empty for none).
    pub fn payload(&self) -> String {
        match self {
            Command::SetRelays { actions } => actions
                .iter()
                .map(RelayAction::to_wire)
                .collect::<Vec<_>>()
                .join(","),
            Command::Raw { payload, .. } => payload.clone(),
            _ => String::new(),
        }
    }

    /// Check that the command can be framed as a single request line.
    pub fn validate(&self) -> CliResult<()> {
        let header = self.header();
        if header.is_empty() {
            return Err(CliError::InvalidCommand("empty header".to_string()));
        }
        if header.contains(['=', '\n', '\r']) {
            return Err(CliError::InvalidCommand(format!(
                "header contains a reserved character: {:?}",
                header
            )));
        }
        if self.payload().contains(['\n', '\r']) {
            return Err(CliError::InvalidCommand(
                "payload contains a line terminator".to_string(),
            ));
        }
        Ok(())
    }

    /// Encode the command as a line to send to the firmware.
    /// Returns the bytes to send (including the `\n` terminator).
    pub fn encode(&self) -> Vec<u8> {
        LineCodec::encode_request(self.header(), &self.payload())
    }

    /// Get the request string without the terminator.
    pub fn to_request_string(&self) -> String {
        let bytes = self.encode();
        String::from_utf8_lossy(&bytes[..bytes.len() - 1]).to_string()
    }
}
