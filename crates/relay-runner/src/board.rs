//! Relay-board session.
//!
//! A [`RelayBoard`] owns the transport to one board and runs the
//! request/response exchange: write one request line, read until one
//! response line arrives or the timeout expires.

use std::fmt;
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use relay_cli_protocol::{CliError, Command, LineCodec, RelayState, Response};
use tracing::{debug, trace};

use crate::hardware::{DeviceLocation, Transport};
use crate::{Result, RunnerError};

/// Default time to wait for a response line.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Poll interval for a single read on the transport.
const READ_SLICE: Duration = Duration::from_millis(50);

/// Identification read from a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardInfo {
    /// Serial number stored in the board.
    pub serial_number: String,
    /// Hardware version.
    pub hardware_version: String,
    /// Firmware version.
    pub firmware_version: String,
}

impl fmt::Display for BoardInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Serial-number:    {}", self.serial_number)?;
        writeln!(f, "Hardware-version: {}", self.hardware_version)?;
        write!(f, "Firmware-version: {}", self.firmware_version)
    }
}

/// A connection to one relay board.
pub struct RelayBoard<T: Transport> {
    serial_number: String,
    location: DeviceLocation,
    transport: T,
    codec: LineCodec,
    timeout: Duration,
}

impl<T: Transport> RelayBoard<T> {
    /// Wrap a transport for the board with the given encoded serial number.
    pub fn new(serial_number: &str, transport: T) -> Result<Self> {
        let location = DeviceLocation::from_serial_number(serial_number)?;
        Ok(Self::with_location(serial_number, location, transport))
    }

    /// Wrap a transport for a board whose serial number is already decoded.
    pub fn with_location(serial_number: &str, location: DeviceLocation, transport: T) -> Self {
        RelayBoard {
            serial_number: serial_number.to_string(),
            location,
            transport,
            codec: LineCodec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the response timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Encoded serial number of the board.
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Location derived from the serial number.
    pub fn location(&self) -> &DeviceLocation {
        &self.location
    }

    /// Release the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Reset the board's microcontroller.
    pub fn reset(&mut self) -> Result<()> {
        debug!("Resetting {}", self.serial_number);
        self.transport.reset()?;
        self.codec.clear();
        Ok(())
    }

    /// Send a command and wait for its response.
    pub fn request(&mut self, command: &Command) -> Result<Response> {
        command.validate()?;
        let request = command.encode();
        trace!("request: {:?}", String::from_utf8_lossy(&request));

        self.codec.clear();
        self.transport.write_all(&request)?;
        self.transport.flush()?;

        let line = self.read_line()?;
        trace!("response: {:?}", line);
        Ok(Response::parse(&line, command.header())?)
    }

    fn read_line(&mut self) -> Result<String> {
        let deadline = Instant::now() + self.timeout;
        let mut buf = [0u8; 64];
        loop {
            if let Some(line) = self.codec.decode_line() {
                return Ok(line);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(CliError::Timeout.into());
            }
            self.transport.set_timeout((deadline - now).min(READ_SLICE))?;
            match self.transport.read(&mut buf) {
                // end of stream: nothing more will arrive
                Ok(0) => return Err(CliError::Timeout.into()),
                Ok(n) => self.codec.push(&buf[..n])?,
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read the serial number stored in the board.
    pub fn read_serial_number(&mut self) -> Result<String> {
        Ok(self.request(&Command::Serial)?.payload)
    }

    /// Read the hardware version.
    pub fn read_hardware_version(&mut self) -> Result<String> {
        Ok(self.request(&Command::HardwareVersion)?.payload)
    }

    /// Read the firmware version.
    pub fn read_firmware_version(&mut self) -> Result<String> {
        Ok(self.request(&Command::FirmwareVersion)?.payload)
    }

    /// Read serial number and versions.
    pub fn read_info(&mut self) -> Result<BoardInfo> {
        Ok(BoardInfo {
            serial_number: self.read_serial_number()?,
            hardware_version: self.read_hardware_version()?,
            firmware_version: self.read_firmware_version()?,
        })
    }

    /// Read the level of every relay.
    pub fn read_relay_state(&mut self) -> Result<RelayState> {
        let response = self.request(&Command::GetRelays)?;
        Ok(RelayState::parse(&response.payload)?)
    }

    /// Drive relays to `state`, then read back and verify.
    ///
    /// Relays not listed in `state` are left alone. An empty state sends
    /// nothing.
    pub fn write_relay_state(&mut self, state: &RelayState) -> Result<()> {
        let actions = state.actions();
        if actions.is_empty() {
            debug!("Nothing to set on {}", self.serial_number);
            return Ok(());
        }
        self.request(&Command::SetRelays { actions })?;

        let read_back = self.read_relay_state()?;
        let missing = read_back.missing_from(state);
        if !missing.is_empty() {
            return Err(RunnerError::StateMismatch {
                serial_number: self.serial_number.clone(),
                missing: missing.iter().map(|a| a.to_wire()).collect(),
            });
        }
        debug!("Relays set on {}: {:?}", self.serial_number, state);
        Ok(())
    }
}
