//! ADS122C04 register map and command set.
//!
//! Reference: Texas Instruments ADS122C04 datasheet (SBAS752A), §8.5/§8.6.
//!
//! ```text
//! 00h |MUX[3:0] | GAIN[2:0] | PGA_BYPASS |
//! 01h |DR[2:0] | MODE | CM | VREF[1:0] | TS |
//! 02h |DRDY | DCNT | CRC[1:0] | BCS | IDAC[2:0] |
//! 03h |I1MUX[2:0] | I2MUX[2:0] | 0 | 0 |
//! ```

use hat_platform::{RegisterEntry, RegisterMap};

/// Addresses selectable with the A0/A1 pins on the HAT.
pub const ADS122C04_ADDRESSES: [u8; 4] = [0x40, 0x41, 0x44, 0x45];

/// Configuration register 0 (MUX, GAIN, PGA_BYPASS).
pub const REG_CFG0: u8 = 0x00;
/// Configuration register 1 (DR, MODE, CM, VREF, TS).
pub const REG_CFG1: u8 = 0x01;
/// Configuration register 2 (DRDY, DCNT, CRC, BCS, IDAC).
pub const REG_CFG2: u8 = 0x02;
/// Configuration register 3 (I1MUX, I2MUX).
pub const REG_CFG3: u8 = 0x03;

/// RESET command.
pub const CMD_RESET: u8 = 0x06;
/// START/SYNC command.
pub const CMD_START: u8 = 0x08;
/// POWERDOWN command.
pub const CMD_POWERDOWN: u8 = 0x02;
/// RDATA command: read the 24-bit conversion result.
pub const CMD_RDATA: u8 = 0x10;
/// RREG command base: `0010 rrxx`.
pub const CMD_RREG: u8 = 0x20;
/// WREG command base: `0100 rrxx`.
pub const CMD_WREG: u8 = 0x40;
/// Register-number field of RREG/WREG.
pub const CMD_REG_MASK: u8 = 0x0C;

/// CFG0 input multiplexer bits used as the channel selector.
pub const CFG0_CHANNEL_MASK: u8 = 0x30;
/// CFG0 channel field shift.
pub const CFG0_CHANNEL_SHIFT: u8 = 4;
/// CFG1 continuous-conversion mode bit (CM).
pub const CFG1_CONTINUOUS: u8 = 0x08;
/// CFG1 reference selection bits (VREF[1:0]).
pub const CFG1_VREF_MASK: u8 = 0x06;
/// CFG2 data-ready flag (DRDY).
pub const CFG2_DRDY: u8 = 0x80;

/// Internal reference voltage, selected when VREF[1:0] = 00.
pub const INTERNAL_REFERENCE_V: f32 = 2.048;

/// Full-scale code span of the 24-bit converter (2^24).
pub const CODE_SPAN: f32 = 16_777_216.0;

/// Register map.
pub const ADS122C04_MAP: RegisterMap = RegisterMap::new(&[
    RegisterEntry::new("CFG0", REG_CFG0),
    RegisterEntry::new("CFG1", REG_CFG1),
    RegisterEntry::new("CFG2", REG_CFG2),
    RegisterEntry::new("CFG3", REG_CFG3),
]);

/// RREG command byte for `reg`.
#[inline]
#[must_use]
pub const fn rreg(reg: u8) -> u8 {
    CMD_RREG | (CMD_REG_MASK & (reg << 2))
}

/// WREG command byte for `reg`.
#[inline]
#[must_use]
pub const fn wreg(reg: u8) -> u8 {
    CMD_WREG | (CMD_REG_MASK & (reg << 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_commands_match_datasheet() {
        assert_eq!(rreg(REG_CFG0), 0x20);
        assert_eq!(rreg(REG_CFG2), 0x28);
        assert_eq!(wreg(REG_CFG1), 0x44);
        assert_eq!(wreg(REG_CFG3), 0x4C);
    }

    #[test]
    fn register_field_is_masked() {
        // Only two register-number bits exist; higher bits never leak into the opcode.
        assert_eq!(wreg(0x07), wreg(REG_CFG3));
        assert_eq!(rreg(0x04), rreg(REG_CFG0));
    }

    #[test]
    fn map_lists_four_config_registers() {
        assert_eq!(ADS122C04_MAP.len(), 4);
        assert_eq!(ADS122C04_MAP.offset("CFG2"), Some(REG_CFG2));
    }
}
