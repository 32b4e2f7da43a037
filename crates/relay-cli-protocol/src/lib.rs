//! Relay-board CLI Protocol
//!
//! This crate provides types and utilities for talking to relay-board
//! firmware over its serial line. The protocol is a simple line-based text
//! exchange: every request gets exactly one response line.
//!
//! # Protocol Overview
//!
//! - **Requests** (host → firmware): `RB+<HEADER>[=<PAYLOAD>]` terminated with `\n`
//! - **Responses** (firmware → host): `+<HEADER>[=<PAYLOAD>]` terminated with `\n`
//!
//! The response echoes the request header; anything else is a protocol error.
//!
//! # Commands
//!
//! - **Info**: `SERIAL`, `HW`, `FW` - return the value as payload
//! - **Relays**: `SET=1-O,2-C` sets relay levels, `GET` returns all of them
//!
//! # Example
//!
//! ```rust,ignore
//! use relay_cli_protocol::{Command, Response};
//!
//! let line = Command::GetRelays.encode(); // b"RB+GET\n"
//! let response = Response::parse("+GET=1-O,2-C", "GET")?;
//! ```

mod codec;
mod commands;
mod error;
mod responses;

pub use codec::*;
pub use commands::*;
pub use error::*;
pub use responses::*;
