//! MCP47CVB24 register map and command encoding.
//!
//! Reference: Microchip MCP47CXBX4/8 datasheet (DS20006537B), §7.
//!
//! | Addr | Register                         | R/W | POR      |
//! |------|----------------------------------|-----|----------|
//! | 00h  | Volatile DAC Wiper Register 0    | R/W | `0x07FF` |
//! | 01h  | Volatile DAC Wiper Register 1    | R/W | `0x07FF` |
//! | 02h  | Volatile DAC Wiper Register 2    | R/W | `0x07FF` |
//! | 03h  | Volatile DAC Wiper Register 3    | R/W | `0x07FF` |
//! | 08h  | Volatile VREF Register           | R/W | `0x0000` |
//! | 09h  | Volatile Power-Down Register     | R/W | `0x0000` |
//! | 0Ah  | Volatile Gain and Status Register| R/W | `0x0080` |

use hat_platform::{RegisterEntry, RegisterMap};

/// Addresses selectable with the A0/A1 pins on the HAT.
pub const MCP47CVB24_ADDRESSES: [u8; 4] = [0x60, 0x61, 0x62, 0x63];

/// Wiper register of channel 0; channels 1-3 follow.
pub const REG_DAC0: u8 = 0x00;
/// Reference selection, 2 bits per channel.
pub const REG_VREF: u8 = 0x08;
/// Power-down selection, 2 bits per channel.
pub const REG_POWER_DOWN: u8 = 0x09;
/// Gain (bits 11:8) and status register.
pub const REG_GAIN_STATUS: u8 = 0x0A;

/// Command bits C1:C0 = 11 (read).
pub const CMD_READ: u8 = 0x06;

/// General-call RESET.
pub const GENERAL_CALL_RESET: u8 = 0x06;
/// General-call WAKE-UP.
pub const GENERAL_CALL_WAKEUP: u8 = 0x0A;

/// Number of output channels.
pub const CHANNEL_COUNT: usize = 4;
/// Channel index mask.
pub const CHANNEL_MASK: u8 = 0x03;
/// Largest 12-bit code.
pub const MAX_CODE: u16 = 4095;
/// Number of codes, the LSB divisor.
pub const CODE_SPAN: f32 = 4096.0;
/// Internal band-gap reference (typ., 1.118 V to 1.260 V).
pub const BAND_GAP_V: f32 = 1.214;

/// Register map.
pub const MCP47CVB24_MAP: RegisterMap = RegisterMap::new(&[
    RegisterEntry::new("DAC0", 0x00),
    RegisterEntry::new("DAC1", 0x01),
    RegisterEntry::new("DAC2", 0x02),
    RegisterEntry::new("DAC3", 0x03),
    RegisterEntry::new("VREF", REG_VREF),
    RegisterEntry::new("PWRDW", REG_POWER_DOWN),
    RegisterEntry::new("GAINSTS", REG_GAIN_STATUS),
]);

/// Wiper register of `channel`, masked to 2 bits.
#[inline]
#[must_use]
pub const fn wiper_register(channel: u8) -> u8 {
    REG_DAC0 | (channel & CHANNEL_MASK)
}

/// Read command byte for `reg`: `AAAAA 11 x`.
#[inline]
#[must_use]
pub const fn read_command(reg: u8) -> u8 {
    (reg << 3) | CMD_READ
}

/// Write command byte for `reg`: `AAAAA 00 x`.
#[inline]
#[must_use]
pub const fn write_command(reg: u8) -> u8 {
    reg << 3
}
