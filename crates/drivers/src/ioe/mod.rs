//! I/O expander drivers
//!
//! - `pca9538a`: NXP PCA9538A 8-bit I/O port
//! - `pcal9538a`: NXP PCAL9538A, the PCA9538A plus Agile I/O registers
//!
//! Both implement [`IoExpander`]; the port operations live there as provided
//! methods over [`RegisterDevice`], so a variant only supplies register access.

pub mod pca9538a;
pub mod pcal9538a;
pub mod registers;

use hat_platform::{log_debug, BusError, Error, RegisterDevice};

pub use pca9538a::Pca9538a;
pub use pcal9538a::{DriveStrength, Pcal9538a};
pub use registers::PCA9538A_ADDRESSES;

use registers::{PIN_COUNT, REG_CONFIG, REG_INPUT, REG_OUTPUT, REG_POLARITY};

/// Single-bit mask of `pin`, `None` outside 0-7.
#[inline]
pub(crate) fn pin_mask(pin: u8) -> Option<u8> {
    (pin < PIN_COUNT).then(|| 1u8.checked_shl(u32::from(pin))).flatten()
}

/// 8-bit port operations shared by every expander variant.
///
/// Pin indices above 7 are ignored: setters do nothing and [`bit`](Self::bit)
/// reads as 0, without touching the bus.
pub trait IoExpander: RegisterDevice<Word = u8> {
    /// Set pin directions; a 1 bit makes the pin an input.
    fn configure_direction(&mut self, mask: u8) -> Result<(), Error<BusError<Self>>> {
        log_debug!("IOE {:#x}: direction {:#x}", self.address().get(), mask);
        self.write_register(REG_CONFIG, mask).map_err(Error::bus)
    }

    /// Current direction register.
    fn direction(&mut self) -> Result<u8, Error<BusError<Self>>> {
        self.read_register(REG_CONFIG).map_err(Error::bus)
    }

    /// Input port levels.
    fn port(&mut self) -> Result<u8, Error<BusError<Self>>> {
        self.read_register(REG_INPUT).map_err(Error::bus)
    }

    /// Write the output port.
    fn set_port(&mut self, value: u8) -> Result<(), Error<BusError<Self>>> {
        self.write_register(REG_OUTPUT, value).map_err(Error::bus)
    }

    /// Output port latch, as last written.
    fn output_port(&mut self) -> Result<u8, Error<BusError<Self>>> {
        self.read_register(REG_OUTPUT).map_err(Error::bus)
    }

    /// Level of input `pin`, 0 or 1.
    fn bit(&mut self, pin: u8) -> Result<u8, Error<BusError<Self>>> {
        let Some(mask) = pin_mask(pin) else {
            return Ok(0);
        };
        let input = self.port()?;
        Ok(u8::from(input & mask != 0))
    }

    /// Drive output `pin` high, leaving the other outputs unchanged.
    fn set_bit(&mut self, pin: u8) -> Result<(), Error<BusError<Self>>> {
        let Some(mask) = pin_mask(pin) else {
            return Ok(());
        };
        let output = self.output_port()?;
        self.set_port(output | mask)
    }

    /// Drive output `pin` low, leaving the other outputs unchanged.
    fn clear_bit(&mut self, pin: u8) -> Result<(), Error<BusError<Self>>> {
        let Some(mask) = pin_mask(pin) else {
            return Ok(());
        };
        let output = self.output_port()?;
        self.set_port(output & !mask)
    }

    /// Invert the input level of every pin whose mask bit is 1.
    fn set_polarity_inversion(&mut self, mask: u8) -> Result<(), Error<BusError<Self>>> {
        self.write_register(REG_POLARITY, mask).map_err(Error::bus)
    }

    /// Polarity inversion register.
    fn polarity_inversion(&mut self) -> Result<u8, Error<BusError<Self>>> {
        self.read_register(REG_POLARITY).map_err(Error::bus)
    }
}
