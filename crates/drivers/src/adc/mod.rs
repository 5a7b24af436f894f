//! ADC (Analog-to-Digital Converter) drivers
//!
//! - `ads122c04`: TI ADS122C04 24-bit delta-sigma ADC

pub mod ads122c04;
pub mod registers;

pub use ads122c04::{Ads122c04, AdcConfig, AppliedAdcConfig};
pub use registers::ADS122C04_ADDRESSES;

/// Assemble a big-endian 24-bit conversion result and sign-extend it.
///
/// `0x800000` decodes to `-8_388_608`, `0x7FFFFF` to `8_388_607`.
#[inline]
#[must_use]
pub const fn decode_conversion(raw: [u8; 3]) -> i32 {
    let [hi, mid, lo] = raw;
    let unsigned = ((hi as u32) << 16) | ((mid as u32) << 8) | lo as u32;
    // Shift the sign bit into bit 31, then arithmetic-shift back.
    #[allow(clippy::cast_possible_wrap)]
    let signed = (unsigned << 8) as i32;
    signed >> 8
}
