//! Serial-number encoding and decoding.
//!
//! ## Formats
//!
//! | Form    | Length | Layout                                                        |
//! |---------|--------|---------------------------------------------------------------|
//! | plain   | 12     | `RB` + 10-character device number (base-36)                   |
//! | encoded | 14     | `RB` + 10 base-36 digits (masked value) + 2 base-36 digits (CRC) |
//!
//! The CRC-8/CDMA2000 of the plain identifier selects a key (the first 8 bytes
//! of its SHA-256 digest). The lower 50 bits of that key are XORed into the
//! device number. Because the key depends only on the CRC, which travels in
//! the clear, decoding can undo the mask and then re-verify the CRC.

use crate::base36;
use crate::crc8::CRC8_CDMA2000;
use crate::hash::derive_key;
use crate::{SerialNumberError, SerialResult};

/// Literal prefix of every serial number.
pub const PREFIX: &str = "RB";

/// Length of a plain serial number.
pub const PLAIN_LEN: usize = 12;

/// Length of an encoded serial number.
pub const ENCODED_LEN: usize = 14;

/// Number of base-36 digits carrying the (masked) device number.
pub const DEVICE_DIGITS: usize = 10;

/// Number of base-36 digits carrying the CRC.
pub const CRC_DIGITS: usize = 2;

/// Mask applied to the key; only the lower 50 bits of the device number are masked.
pub const KEY_MASK: u64 = (1 << 50) - 1;

/// Encode a 12-character plain serial number into its 14-character public form.
pub fn encode(plain: &str) -> SerialResult<String> {
    assert_format(plain, PLAIN_LEN)?;

    let crc = CRC8_CDMA2000.checksum(plain.as_bytes());
    let key = derive_key(crc);

    let device = base36::decode(&plain[PREFIX.len()..])?;
    let masked = device ^ (key & KEY_MASK);

    let mut encoded = String::with_capacity(ENCODED_LEN);
    encoded.push_str(&plain[..PREFIX.len()]);
    encoded.push_str(&base36::encode(masked, DEVICE_DIGITS));
    encoded.push_str(&base36::encode(u64::from(crc), CRC_DIGITS));

    // a device number above 50 bits can spill into an eleventh digit
    assert_format(&encoded, ENCODED_LEN)?;
    Ok(encoded)
}

/// Decode a 14-character encoded serial number back to its plain form.
///
/// Fails with [`SerialNumberError::Integrity`] when the recovered identifier
/// does not reproduce the carried CRC.
pub fn decode(encoded: &str) -> SerialResult<String> {
    assert_format(encoded, ENCODED_LEN)?;

    let crc_start = PREFIX.len() + DEVICE_DIGITS;
    let crc_value = base36::decode(&encoded[crc_start..])?;
    let expected = u8::try_from(crc_value).map_err(|_| {
        SerialNumberError::format(encoded, format!("CRC field {} exceeds one byte", crc_value))
    })?;
    let key = derive_key(expected);

    let masked = base36::decode(&encoded[PREFIX.len()..crc_start])?;
    let device = masked ^ (key & KEY_MASK);

    let mut plain = String::with_capacity(PLAIN_LEN);
    plain.push_str(&encoded[..PREFIX.len()]);
    plain.push_str(&base36::encode(device, DEVICE_DIGITS));

    let actual = CRC8_CDMA2000.checksum(plain.as_bytes());
    if actual != expected {
        return Err(SerialNumberError::Integrity { expected, actual });
    }

    assert_format(&plain, PLAIN_LEN)?;
    Ok(plain)
}

/// Check length, character set, and prefix of a serial number.
///
/// Length is counted in bytes; non-ASCII identifiers are rejected.
pub fn assert_format(serial_number: &str, expected_len: usize) -> SerialResult<()> {
    if serial_number.len() != expected_len {
        return Err(SerialNumberError::format(
            serial_number,
            format!("length {}, must be {}", serial_number.len(), expected_len),
        ));
    }
    if !serial_number.is_ascii() {
        return Err(SerialNumberError::format(serial_number, "must be ASCII"));
    }
    if !serial_number.starts_with(PREFIX) {
        return Err(SerialNumberError::format(
            serial_number,
            format!("must start with '{}'", PREFIX),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "RB00D30GR9J1";
    const ENCODED: &str = "RB90FJ7SIHYU1F";

    #[test]
    fn test_encode_known_vector() {
        assert_eq!(encode(PLAIN).unwrap(), ENCODED);
    }

    #[test]
    fn test_decode_known_vector() {
        assert_eq!(decode(ENCODED).unwrap(), PLAIN);
    }

    #[test]
    fn test_roundtrip() {
        for plain in [
            "RB0000000000",
            "RB0000000001",
            "RB00D30GR9J1",
            "RBABCDEFGHIJ",
            "RB73ZZZZZZZZ",
        ] {
            let encoded = encode(plain).unwrap();
            assert_eq!(encoded.len(), ENCODED_LEN);
            assert!(encoded.starts_with(PREFIX));
            assert_eq!(decode(&encoded).unwrap(), plain);
        }
    }

    #[test]
    fn test_crc_suffix_is_plain_crc() {
        let encoded = encode(PLAIN).unwrap();
        let crc = CRC8_CDMA2000.checksum(PLAIN.as_bytes());
        assert_eq!(&encoded[12..], base36::encode(u64::from(crc), 2));
    }

    #[test]
    fn test_encode_deterministic() {
        assert_eq!(encode(PLAIN).unwrap(), encode(PLAIN).unwrap());
    }

    #[test]
    fn test_encode_rejects_bad_length() {
        for input in ["", "RB", "RB00D30GR9J", "RB00D30GR9J12", ENCODED] {
            assert!(
                matches!(encode(input), Err(SerialNumberError::Format { .. })),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_encode_rejects_bad_prefix() {
        assert!(matches!(
            encode("XB00D30GR9J1"),
            Err(SerialNumberError::Format { .. })
        ));
        assert!(matches!(
            encode("rb00D30GR9J1"),
            Err(SerialNumberError::Format { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_non_ascii() {
        // 12 bytes, but 'é' is two of them
        assert!(matches!(
            encode("RBé00000000"),
            Err(SerialNumberError::Format { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_invalid_digit() {
        assert!(matches!(
            encode("RB00d30GR9J1"),
            Err(SerialNumberError::InvalidDigit { digit: 'd', position: 2 })
        ));
    }

    #[test]
    fn test_encode_device_number_beyond_mask_width() {
        // upper bits pass through unmasked and overflow ten digits
        assert!(matches!(
            encode("RBZZZZZZZZZZ"),
            Err(SerialNumberError::Format { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_length() {
        for input in ["", PLAIN, "RB90FJ7SIHYU1", "RB90FJ7SIHYU1FF"] {
            assert!(
                matches!(decode(input), Err(SerialNumberError::Format { .. })),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_decode_rejects_bad_prefix() {
        assert!(matches!(
            decode("XX90FJ7SIHYU1F"),
            Err(SerialNumberError::Format { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_digit() {
        assert!(matches!(
            decode("RB90fJ7SIHYU1F"),
            Err(SerialNumberError::InvalidDigit { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_crc_field_above_byte() {
        assert!(matches!(
            decode("RB90FJ7SIHYUZZ"),
            Err(SerialNumberError::Format { .. })
        ));
    }

    #[test]
    fn test_decode_detects_tampered_digit() {
        let err = decode("RB90FJ7SIHYV1F").unwrap_err();
        assert!(err.is_integrity());

        let err = decode("RBA0FJ7SIHYU1F").unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn test_decode_detects_every_single_digit_flip() {
        let encoded = encode(PLAIN).unwrap();
        let alphabet = std::str::from_utf8(base36::ALPHABET).unwrap();
        for position in 2..12 {
            for replacement in alphabet.chars() {
                let mut tampered: Vec<char> = encoded.chars().collect();
                if tampered[position] == replacement {
                    continue;
                }
                tampered[position] = replacement;
                let tampered: String = tampered.into_iter().collect();
                assert!(
                    matches!(decode(&tampered), Err(SerialNumberError::Integrity { .. })),
                    "tampered {:?} was accepted",
                    tampered
                );
            }
        }
    }

    #[test]
    fn test_decode_detects_tampered_crc() {
        // different CRC means a different key and a different recovered identifier
        assert!(decode("RB90FJ7SIHYU1G").is_err());
    }
}
