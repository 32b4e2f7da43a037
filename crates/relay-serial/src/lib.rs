//! Relay-board serial numbers.
//!
//! Relay boards are labelled with a 14-character encoded serial number that
//! hides the sequential 12-character plain serial number assigned at
//! production. This crate converts between the two forms:
//!
//! - [`base36`]: fixed-alphabet integer encoding
//! - [`crc8`]: configurable CRC-8, with the CDMA2000 variant used here
//! - [`hash`]: SHA-256 and masking-key derivation
//! - [`serial_number`]: the encode/decode transform and format checks
//!
//! The mask resists casual guessing of neighbouring serial numbers; it is not
//! encryption. The key is derived from a CRC that travels in the clear.
//!
//! # Example
//!
//! ```
//! use relay_serial::{decode, encode};
//!
//! let encoded = encode("RB00D30GR9J1")?;
//! assert_eq!(encoded, "RB90FJ7SIHYU1F");
//! assert_eq!(decode(&encoded)?, "RB00D30GR9J1");
//! # Ok::<(), relay_serial::SerialNumberError>(())
//! ```

pub mod base36;
pub mod crc8;
mod error;
pub mod hash;
pub mod serial_number;

pub use crc8::{Crc8, Crc8Params, CRC8_CDMA2000};
pub use error::{SerialNumberError, SerialResult};
pub use serial_number::{decode, encode, ENCODED_LEN, PLAIN_LEN, PREFIX};
