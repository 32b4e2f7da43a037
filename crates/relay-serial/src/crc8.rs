//! Configurable CRC-8.
//!
//! The engine is bit-wise and MSB-first; reflected variants reflect each
//! input byte before it enters the register and reflect the register before
//! the final XOR. Serial numbers use [`CRC8_CDMA2000`].

/// Parameters of a CRC-8 variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc8Params {
    /// Generator polynomial, implicit x^8 term omitted.
    pub poly: u8,
    /// Register value before any input.
    pub init: u8,
    /// Reflect each input byte.
    pub reflect_in: bool,
    /// Reflect the register before the final XOR.
    pub reflect_out: bool,
    /// Value XORed into the result.
    pub xor_out: u8,
}

impl Crc8Params {
    /// Compute the CRC of `data` in one call.
    pub fn checksum(&self, data: &[u8]) -> u8 {
        let mut crc = Crc8::new(*self);
        crc.process(data);
        crc.finalize()
    }
}

/// CRC-8/CDMA2000: poly 0x9B, init 0xFF, no reflection, no output XOR.
///
/// Check value over `"123456789"` is `0xDA`.
pub const CRC8_CDMA2000: Crc8Params = Crc8Params {
    poly: 0x9B,
    init: 0xFF,
    reflect_in: false,
    reflect_out: false,
    xor_out: 0x00,
};

/// Bit-reversal of every byte value, generated at compile time.
const REFLECT_TABLE: [u8; 256] = generate_reflect_table();

const fn generate_reflect_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut value = i as u8;
        let mut reflected = 0u8;
        let mut bit = 0;
        while bit < 8 {
            reflected = (reflected << 1) | (value & 1);
            value >>= 1;
            bit += 1;
        }
        table[i] = reflected;
        i += 1;
    }
    table
}

/// Reverse the bit order of a byte.
#[inline]
pub fn reflect(byte: u8) -> u8 {
    REFLECT_TABLE[byte as usize]
}

/// A CRC-8 accumulator for a single computation.
///
/// `process` may be called any number of times; `finalize` reads the result
/// without consuming the register. Use a fresh value (or [`Crc8::reset`]) for
/// each independent computation.
#[derive(Debug, Clone)]
pub struct Crc8 {
    params: Crc8Params,
    register: u8,
}

impl Crc8 {
    /// Create an accumulator in its initial state.
    pub fn new(params: Crc8Params) -> Self {
        Crc8 {
            params,
            register: params.init,
        }
    }

    /// The parameters this accumulator was created with.
    pub fn params(&self) -> Crc8Params {
        self.params
    }

    /// Feed bytes into the register.
    pub fn process(&mut self, data: &[u8]) {
        for &byte in data {
            let byte = if self.params.reflect_in {
                reflect(byte)
            } else {
                byte
            };
            self.register ^= byte;
            for _ in 0..8 {
                if self.register & 0x80 != 0 {
                    self.register = (self.register << 1) ^ self.params.poly;
                } else {
                    self.register <<= 1;
                }
            }
        }
    }

    /// Final CRC of everything processed so far.
    pub fn finalize(&self) -> u8 {
        let register = if self.params.reflect_out {
            reflect(self.register)
        } else {
            self.register
        };
        register ^ self.params.xor_out
    }

    /// Return the register to its initial value.
    pub fn reset(&mut self) {
        self.register = self.params.init;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECK_INPUT: &[u8] = b"123456789";

    /// CRC-8/SMBUS, the plain 0x07 polynomial.
    const CRC8_SMBUS: Crc8Params = Crc8Params {
        poly: 0x07,
        init: 0x00,
        reflect_in: false,
        reflect_out: false,
        xor_out: 0x00,
    };

    /// CRC-8/MAXIM-DOW (1-Wire), a reflected variant.
    const CRC8_MAXIM_DOW: Crc8Params = Crc8Params {
        poly: 0x31,
        init: 0x00,
        reflect_in: true,
        reflect_out: true,
        xor_out: 0x00,
    };

    #[test]
    fn test_cdma2000_check_value() {
        assert_eq!(CRC8_CDMA2000.checksum(CHECK_INPUT), 0xDA);
    }

    #[test]
    fn test_other_variants_check_values() {
        assert_eq!(CRC8_SMBUS.checksum(CHECK_INPUT), 0xF4);
        assert_eq!(CRC8_MAXIM_DOW.checksum(CHECK_INPUT), 0xA1);
    }

    #[test]
    fn test_empty_input_is_init() {
        assert_eq!(CRC8_CDMA2000.checksum(&[]), 0xFF);
    }

    #[test]
    fn test_serial_number_crc() {
        assert_eq!(CRC8_CDMA2000.checksum(b"RB00D30GR9J1"), 0x33);
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut crc = Crc8::new(CRC8_CDMA2000);
        crc.process(b"1234");
        crc.process(b"");
        crc.process(b"56789");
        assert_eq!(crc.finalize(), 0xDA);
        // reading the result does not disturb the register
        assert_eq!(crc.finalize(), 0xDA);
    }

    #[test]
    fn test_residual_state_without_reset() {
        let mut crc = Crc8::new(CRC8_CDMA2000);
        crc.process(CHECK_INPUT);
        crc.process(CHECK_INPUT);
        assert_ne!(crc.finalize(), 0xDA);

        crc.reset();
        crc.process(CHECK_INPUT);
        assert_eq!(crc.finalize(), 0xDA);
    }

    #[test]
    fn test_reflect_table() {
        assert_eq!(reflect(0x00), 0x00);
        assert_eq!(reflect(0x01), 0x80);
        assert_eq!(reflect(0x0F), 0xF0);
        assert_eq!(reflect(0xA5), 0xA5);
        assert_eq!(reflect(0x12), 0x48);
        for b in 0..=255u8 {
            assert_eq!(reflect(b), b.reverse_bits());
        }
    }
}
