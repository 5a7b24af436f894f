//! Sensirion CRC-8: polynomial x^8 + x^5 + x^4 + 1 (0x31), init 0x00,
//! MSB first, no final XOR.

/// Generator polynomial.
pub const CRC8_POLYNOMIAL: u8 = 0x31;

/// CRC-8 over `data`.
#[must_use]
pub fn crc8(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |crc, &byte| {
        (0..8).fold(crc ^ byte, |crc, _| {
            if crc & 0x80 != 0 {
                (crc << 1) ^ CRC8_POLYNOMIAL
            } else {
                crc << 1
            }
        })
    })
}

/// Whether the third byte of `frame` is the CRC of the first two.
#[must_use]
pub fn check_crc8(frame: [u8; 3]) -> bool {
    let [msb, lsb, crc] = frame;
    crc8(&[msb, lsb]) == crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_frames() {
        assert_eq!(crc8(&[0x00, 0x00]), 0x00);
        assert_eq!(crc8(&[0xBE, 0xEF]), 0x13);
        assert_eq!(crc8(&[0x02, 0x58]), 0x1E);
        assert_eq!(crc8(&[0x77, 0x82]), 0x8D);
    }

    #[test]
    fn check_compares_third_byte() {
        assert!(check_crc8([0x02, 0x58, 0x1E]));
        assert!(!check_crc8([0x02, 0x58, 0x1F]));
        assert!(!check_crc8([0x02, 0x59, 0x1E]));
    }
}
