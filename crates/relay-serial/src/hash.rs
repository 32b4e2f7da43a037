//! SHA-256 digest and masking-key derivation.

use sha2::{Digest, Sha256};

/// Length of a SHA-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// SHA-256 digest of `data`.
pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(data).into()
}

/// Derive the 64-bit masking key for a CRC byte.
///
/// The key is the first 8 bytes of `SHA-256([crc])`, read big-endian.
pub fn derive_key(crc: u8) -> u64 {
    let hash = digest(&[crc]);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash[..8]);
    u64::from_be_bytes(prefix)
}
