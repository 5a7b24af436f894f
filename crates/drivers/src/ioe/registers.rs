//! PCA9538A / PCAL9538A register maps.
//!
//! Reference: NXP PCA9538A (Rev. 6) and PCAL9538A (Rev. 3) datasheets.
//!
//! | Addr | Register              | PCA9538A | PCAL9538A |
//! |------|-----------------------|----------|-----------|
//! | 00h  | Input port            | yes      | yes       |
//! | 01h  | Output port           | yes      | yes       |
//! | 02h  | Polarity inversion    | yes      | yes       |
//! | 03h  | Configuration (1 = in)| yes      | yes       |
//! | 40h  | Output drive 0 (P0-3) |          | yes       |
//! | 41h  | Output drive 1 (P4-7) |          | yes       |
//! | 42h  | Input latch           |          | yes       |
//! | 43h  | Pull-up/down enable   |          | yes       |
//! | 44h  | Pull-up/down select   |          | yes       |
//! | 45h  | Interrupt mask        |          | yes       |
//! | 46h  | Interrupt status      |          | yes       |
//! | 4Fh  | Output port config    |          | yes       |

use hat_platform::{RegisterEntry, RegisterMap};

/// Addresses selectable with the A0/A1 pins on the HAT.
pub const PCA9538A_ADDRESSES: [u8; 4] = [0x70, 0x71, 0x72, 0x73];

/// Input port register (read-only).
pub const REG_INPUT: u8 = 0x00;
/// Output port register.
pub const REG_OUTPUT: u8 = 0x01;
/// Polarity inversion register.
pub const REG_POLARITY: u8 = 0x02;
/// Direction register; 1 = input.
pub const REG_CONFIG: u8 = 0x03;

/// Output drive strength, pins 0-3.
pub const REG_DRIVE0: u8 = 0x40;
/// Output drive strength, pins 4-7.
pub const REG_DRIVE1: u8 = 0x41;
/// Input latch.
pub const REG_INPUT_LATCH: u8 = 0x42;
/// Pull-up/pull-down enable.
pub const REG_PULL_ENABLE: u8 = 0x43;
/// Pull-up/pull-down select; 1 = pull-up.
pub const REG_PULL_SELECT: u8 = 0x44;
/// Interrupt mask; 1 = masked.
pub const REG_IRQ_MASK: u8 = 0x45;
/// Interrupt status (read-only).
pub const REG_IRQ_STATUS: u8 = 0x46;
/// Output port configuration; bit 0 = open-drain.
pub const REG_OUTPUT_CONFIG: u8 = 0x4F;

/// `REG_OUTPUT_CONFIG` value for open-drain outputs.
pub const OUTPUT_OPEN_DRAIN: u8 = 0x01;
/// `REG_OUTPUT_CONFIG` value for push-pull outputs.
pub const OUTPUT_PUSH_PULL: u8 = 0x00;

/// Number of port pins.
pub const PIN_COUNT: u8 = 8;

const BASE_ENTRIES: &[RegisterEntry] = &[
    RegisterEntry::new("IN", REG_INPUT),
    RegisterEntry::new("OUT", REG_OUTPUT),
    RegisterEntry::new("INVIN", REG_POLARITY),
    RegisterEntry::new("CFGIO", REG_CONFIG),
];

const EXTENDED_ENTRIES: &[RegisterEntry] = &[
    RegisterEntry::new("DRV0", REG_DRIVE0),
    RegisterEntry::new("DRV1", REG_DRIVE1),
    RegisterEntry::new("LATCHIN", REG_INPUT_LATCH),
    RegisterEntry::new("PULLUDEN", REG_PULL_ENABLE),
    RegisterEntry::new("PULLUDSEL", REG_PULL_SELECT),
    RegisterEntry::new("IRQMSK", REG_IRQ_MASK),
    RegisterEntry::new("IRQSTS", REG_IRQ_STATUS),
    RegisterEntry::new("CFGOUT", REG_OUTPUT_CONFIG),
];

/// PCA9538A register map.
pub const PCA9538A_MAP: RegisterMap = RegisterMap::new(BASE_ENTRIES);

/// PCAL9538A register map: the PCA9538A map plus the Agile I/O registers.
pub const PCAL9538A_MAP: RegisterMap = PCA9538A_MAP.extend(EXTENDED_ENTRIES);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_map_keeps_every_base_register() {
        assert_eq!(PCA9538A_MAP.len(), 4);
        assert_eq!(PCAL9538A_MAP.len(), 12);
        for entry in PCA9538A_MAP.iter() {
            assert_eq!(PCAL9538A_MAP.offset(entry.name), Some(entry.offset));
        }
        assert_eq!(PCAL9538A_MAP.offset("CFGOUT"), Some(0x4F));
        assert!(!PCA9538A_MAP.contains("PULLUDEN"));
    }
}
