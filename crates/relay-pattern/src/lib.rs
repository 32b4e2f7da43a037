//! Relay-board pattern files.
//!
//! A pattern file names a group of relay boards by alias and describes, per
//! named pattern, which relays on each board to open or close. Every serial
//! number is checked with the serial-number codec when the file is loaded.

mod error;
mod pattern;

pub use error::{PatternError, PatternResult};
pub use pattern::{
    Alias, NamedPattern, RelayBoardPattern, RelayPattern, SINGLE_ALIAS, SINGLE_PATTERN,
};
