//! # relay-runner
//!
//! Drives relay boards over their USB serial ports.
//!
//! - [`hardware`]: locating a board's port from its serial number, opening
//!   it, and resetting the board
//! - [`board`]: the request/response session with one board
//! - [`cli`]: argument parsing and the pattern-driven run loop

pub mod board;
pub mod cli;
mod error;
pub mod hardware;

pub use board::{BoardInfo, RelayBoard, DEFAULT_TIMEOUT};
pub use cli::{run_pattern, BoardReport, Cli, CliCommand, RunArgs, RunOptions};
pub use error::{Result, RunnerError};
pub use hardware::{find_port, open_port, DeviceLocation, Transport};
