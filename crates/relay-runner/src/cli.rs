//! Command-line interface.
//!
//! Boards are driven either by one serial number with explicit relay lists
//! (`run -s RB... -o 1,2 -c 3`) or by a pattern file (`run -f file.json -p P1`).

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Args, Parser, Subcommand};
use relay_cli_protocol::RelayState;
use relay_pattern::RelayBoardPattern;
use tracing::info;

use crate::board::{BoardInfo, RelayBoard};
use crate::hardware::{DeviceLocation, Transport};
use crate::{Result, RunnerError};

/// Control relay-boards by serial number or by JSON pattern file.
#[derive(Debug, Parser)]
#[command(name = "relay-board", version)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Encode a 12-character plain serial number.
    Encode {
        /// Plain serial number, e.g. RB00D30GR9J1.
        plain: String,
    },

    /// Decode a 14-character encoded serial number.
    Decode {
        /// Encoded serial number, e.g. RB90FJ7SIHYU1F.
        encoded: String,
    },

    /// Validate a pattern file and list its aliases.
    Check {
        /// Path to the JSON pattern file.
        file: PathBuf,
    },

    /// Drive relay boards.
    Run(RunArgs),
}

/// Arguments of the `run` subcommand.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["serial_number", "file"])))]
pub struct RunArgs {
    /// Serial number in single-board mode.
    #[arg(short, long)]
    pub serial_number: Option<String>,

    /// Relay ids to open, e.g. "-o 1,2,3".
    #[arg(short, long, value_delimiter = ',', conflicts_with = "file")]
    pub open: Option<Vec<u32>>,

    /// Relay ids to close, e.g. "-c 1,2,3".
    #[arg(short, long, value_delimiter = ',', conflicts_with = "file")]
    pub close: Option<Vec<u32>>,

    /// JSON pattern file.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Pattern to use from the file (optional if the file has only one).
    #[arg(short, long, conflicts_with = "serial_number")]
    pub pattern: Option<String>,

    /// Reset the board(s) before setting relays.
    #[arg(short, long)]
    pub reset: bool,

    /// Print serial number and versions of the board(s).
    #[arg(short, long)]
    pub info: bool,

    /// Response timeout in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub timeout_ms: u64,
}

impl RunArgs {
    /// Build the pattern set the arguments describe.
    pub fn load_pattern(&self) -> Result<RelayBoardPattern> {
        let pattern = match (&self.serial_number, &self.file) {
            (Some(serial_number), _) => RelayBoardPattern::from_serial_number(
                serial_number,
                self.open.clone(),
                self.close.clone(),
            )?,
            (None, Some(file)) => RelayBoardPattern::from_file(file)?,
            (None, None) => return Err(RunnerError::MissingTarget),
        };
        Ok(pattern)
    }

    /// Options for [`run_pattern`].
    pub fn options(&self) -> RunOptions {
        RunOptions {
            pattern: if self.file.is_some() {
                self.pattern.clone()
            } else {
                None
            },
            reset: self.reset,
            info: self.info,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

/// What to do with each board.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Pattern name, `None` to use the only pattern.
    pub pattern: Option<String>,
    /// Reset before setting relays.
    pub reset: bool,
    /// Read board identification.
    pub info: bool,
    /// Response timeout.
    pub timeout: Duration,
}

/// Outcome for one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardReport {
    /// Encoded serial number.
    pub serial_number: String,
    /// Identification, when requested.
    pub info: Option<BoardInfo>,
    /// State written to the board.
    pub state: RelayState,
}

/// Apply a pattern to every board it names.
///
/// All serial numbers are decoded and every board is located with `locate`
/// before any board is contacted, so a missing board leaves every relay
/// untouched. `open` then connects to one located board at a time; the
/// transport is dropped once that board is done.
pub fn run_pattern<P, T, L, O>(
    pattern: &RelayBoardPattern,
    options: &RunOptions,
    mut locate: L,
    mut open: O,
) -> Result<Vec<BoardReport>>
where
    T: Transport,
    L: FnMut(&DeviceLocation) -> Result<P>,
    O: FnMut(P) -> Result<T>,
{
    let mut planned = Vec::new();
    for serial_number in pattern.serial_numbers() {
        let location = DeviceLocation::from_serial_number(&serial_number)?;
        let state = pattern.pattern_for(&serial_number, options.pattern.as_deref())?;
        planned.push((serial_number, location, state));
    }

    let mut located = Vec::with_capacity(planned.len());
    for (serial_number, location, state) in planned {
        let port = locate(&location)?;
        located.push((serial_number, location, state, port));
    }

    let mut reports = Vec::with_capacity(located.len());
    for (serial_number, location, state, port) in located {
        info!("Board {} (device {})", serial_number, location.device_number);
        let transport = open(port)?;
        let mut board = RelayBoard::with_location(&serial_number, location, transport)
            .with_timeout(options.timeout);

        let info = if options.info {
            Some(board.read_info()?)
        } else {
            None
        };
        if options.reset {
            board.reset()?;
        }
        board.write_relay_state(&state)?;

        reports.push(BoardReport {
            serial_number,
            info,
            state,
        });
    }
    Ok(reports)
}

/// Describe a pattern file for `check`.
pub fn describe_pattern(pattern: &RelayBoardPattern) -> String {
    let mut out = String::new();
    for alias in pattern.aliases() {
        out.push_str(&format!("{}: {}\n", alias.name, alias.serial_number));
    }
    out.push_str(&format!("patterns: {}", pattern.pattern_names().join(", ")));
    out
}
