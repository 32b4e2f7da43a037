//! Serial hardware access for relay boards.
//!
//! A relay board enumerates as a USB serial adapter whose USB serial number
//! starts with the board's device number. The device number is recovered by
//! decoding the board's encoded serial number.
//!
//! The RTS and DTR lines are expressed as pin levels, which are the inverse
//! of the asserted state of the modem-control signal.

use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

use serialport::{SerialPort, SerialPortInfo, SerialPortType};
use tracing::debug;

use crate::{Result, RunnerError};

/// Baud rate used by the relay-board firmware.
pub const BAUD_RATE: u32 = 115_200;

/// Time for control-line changes to settle.
pub const SETTLE_TIME: Duration = Duration::from_millis(20);

// ============================================================================
// Device Location
// ============================================================================

/// Where to find a board, derived from its serial number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLocation {
    /// Characters 3-4 of the plain serial number, reserved for board configuration.
    pub config_identifier: String,
    /// Characters 5-12 of the plain serial number, the USB serial-number prefix.
    pub device_number: String,
}

impl DeviceLocation {
    /// Decode an encoded serial number and split out the device number.
    pub fn from_serial_number(encoded: &str) -> Result<Self> {
        let plain = relay_serial::decode(encoded)?;
        Ok(DeviceLocation {
            config_identifier: plain[2..4].to_string(),
            device_number: plain[4..12].to_string(),
        })
    }
}

// ============================================================================
// Port Discovery
// ============================================================================

/// A serial port that could host a relay board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    /// Port name (e.g., "/dev/ttyUSB0" or "COM3").
    pub name: String,
    /// USB serial number, if the port is a USB adapter that reports one.
    pub usb_serial_number: Option<String>,
}

impl From<SerialPortInfo> for PortCandidate {
    fn from(info: SerialPortInfo) -> Self {
        let usb_serial_number = match info.port_type {
            SerialPortType::UsbPort(usb_info) => usb_info.serial_number,
            _ => None,
        };
        PortCandidate {
            name: info.port_name,
            usb_serial_number,
        }
    }
}

/// First candidate whose USB serial number starts with `device_number`.
pub fn match_port<'a>(candidates: &'a [PortCandidate], device_number: &str) -> Option<&'a PortCandidate> {
    candidates.iter().find(|c| {
        c.usb_serial_number
            .as_deref()
            .is_some_and(|sn| sn.starts_with(device_number))
    })
}

/// Find the port name for a device number among the connected ports.
pub fn find_port(device_number: &str) -> Result<String> {
    let candidates: Vec<PortCandidate> = serialport::available_ports()?
        .into_iter()
        .map(PortCandidate::from)
        .collect();
    debug!("Found {} serial ports", candidates.len());
    match_port(&candidates, device_number)
        .map(|c| c.name.clone())
        .ok_or_else(|| RunnerError::PortNotFound(device_number.to_string()))
}

// ============================================================================
// Transport
// ============================================================================

/// A byte stream to a relay board.
pub trait Transport: Read + Write {
    /// Set the timeout for a single read.
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()>;

    /// Reset the board's microcontroller.
    fn reset(&mut self) -> io::Result<()>;
}

impl Transport for Box<dyn SerialPort> {
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        SerialPort::set_timeout(self.as_mut(), timeout)?;
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        self.set_parity(serialport::Parity::None)?;
        set_dtr_level(self.as_mut(), true)?;
        set_rts_level(self.as_mut(), false)?;
        thread::sleep(SETTLE_TIME);
        set_dtr_level(self.as_mut(), true)?;
        set_rts_level(self.as_mut(), true)?;
        thread::sleep(SETTLE_TIME);
        Ok(())
    }
}

/// Set the RTS pin level.
fn set_rts_level(port: &mut dyn SerialPort, level: bool) -> io::Result<()> {
    port.write_request_to_send(!level)?;
    Ok(())
}

/// Set the DTR pin level.
fn set_dtr_level(port: &mut dyn SerialPort, level: bool) -> io::Result<()> {
    port.write_data_terminal_ready(!level)?;
    Ok(())
}

/// Open a board's serial port at 115200 8N1.
///
/// RTS is raised before DTR; the opposite order resets the microcontroller.
pub fn open_port(name: &str, timeout: Duration) -> Result<Box<dyn SerialPort>> {
    debug!("Opening {} at {} baud", name, BAUD_RATE);
    let mut port = serialport::new(name, BAUD_RATE)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(timeout)
        .open()?;
    set_rts_level(port.as_mut(), true)?;
    set_dtr_level(port.as_mut(), true)?;
    thread::sleep(SETTLE_TIME);
    Ok(port)
}
