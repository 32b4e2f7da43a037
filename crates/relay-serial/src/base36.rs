//! Base-36 integer encoding.
//!
//! Digits are `0-9` followed by `A-Z`, most significant digit first.
//! Decoding is case-sensitive: lowercase letters are rejected.

use crate::{SerialNumberError, SerialResult};

/// Number of symbols in the alphabet.
pub const RADIX: u64 = 36;

/// Digit alphabet, index `n` is the symbol for value `n`.
pub const ALPHABET: &[u8; RADIX as usize] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Encode `value` as base-36, left-padded with `'0'` to at least `min_digits`.
///
/// `encode(0, n)` yields `n` zeros (and an empty string for `n == 0`).
pub fn encode(mut value: u64, min_digits: usize) -> String {
    // 13 digits cover u64::MAX
    let mut digits = Vec::with_capacity(min_digits.max(13));
    while value > 0 {
        digits.push(ALPHABET[(value % RADIX) as usize]);
        value /= RADIX;
    }
    while digits.len() < min_digits {
        digits.push(b'0');
    }
    digits.iter().rev().map(|&d| d as char).collect()
}

/// Decode base-36 text into an integer.
pub fn decode(text: &str) -> SerialResult<u64> {
    let mut result: u64 = 0;
    for (position, c) in text.chars().enumerate() {
        let digit = digit_value(c).ok_or(SerialNumberError::InvalidDigit { digit: c, position })?;
        result = result
            .checked_mul(RADIX)
            .and_then(|r| r.checked_add(digit))
            .ok_or_else(|| SerialNumberError::format(text, "base-36 value exceeds 64 bits"))?;
    }
    Ok(result)
}

/// Value of a single base-36 digit, `None` if not in the alphabet.
fn digit_value(c: char) -> Option<u64> {
    match c {
        '0'..='9' => Some(c as u64 - '0' as u64),
        'A'..='Z' => Some(c as u64 - 'A' as u64 + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_zero_padding() {
        assert_eq!(encode(0, 3), "000");
        assert_eq!(encode(0, 0), "");
        assert_eq!(encode(35, 2), "0Z");
        assert_eq!(encode(36, 0), "10");
    }

    #[test]
    fn test_encode_does_not_truncate() {
        // min_digits is a floor, not a width
        assert_eq!(encode(36 * 36, 2), "100");
    }

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode("").unwrap(), 0);
        assert_eq!(decode("Z").unwrap(), 35);
        assert_eq!(decode("1F").unwrap(), 51);
        assert_eq!(decode("0000000010").unwrap(), 36);
        assert_eq!(decode("ZZZZZZZZZZ").unwrap(), 36u64.pow(10) - 1);
    }

    #[test]
    fn test_decode_rejects_lowercase() {
        let err = decode("1f").unwrap_err();
        assert_eq!(
            err,
            SerialNumberError::InvalidDigit {
                digit: 'f',
                position: 1
            }
        );
    }

    #[test]
    fn test_decode_rejects_punctuation() {
        assert!(matches!(
            decode("12-4"),
            Err(SerialNumberError::InvalidDigit { digit: '-', position: 2 })
        ));
    }

    #[test]
    fn test_decode_overflow_is_format_error() {
        assert!(matches!(
            decode("ZZZZZZZZZZZZZZ"),
            Err(SerialNumberError::Format { .. })
        ));
    }

    #[test]
    fn test_symmetry_across_ranges() {
        let limit = 36u64.pow(10);
        let samples = [
            0,
            1,
            35,
            36,
            1295,
            46_655,
            (1 << 50) - 1,
            1 << 50,
            limit / 2,
            limit - 1,
        ];
        for &v in &samples {
            for min_digits in [0, 2, 10] {
                assert_eq!(decode(&encode(v, min_digits)).unwrap(), v, "value {}", v);
            }
        }
    }
}
